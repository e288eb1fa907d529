pub mod command;
pub mod instruction;

pub use command::SpecialCommand;
pub use instruction::{ConsumerStep, Instruction, PointerAction};

use crate::app::Macro;
use crate::device::satellite::SatelliteBus;
use crate::device::{DisplaySurface, OutputDevice, Peripherals};
use crate::power::PowerManager;
use crate::render::GRID_KEYS;
use tracing::debug;

/// Plays macro sequences against the output device.
///
/// The same sequence is replayed on key-down and key-up. Delays are awaited
/// inline, so the caller's loop is held for the whole macro.
#[derive(Debug, Default)]
pub struct Interpreter {
    skipped: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsupported instructions skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Run the press or release phase of the macro bound to `key`.
    pub async fn execute<O, D, B>(
        &mut self,
        key: usize,
        binding: &Macro,
        pressed: bool,
        hw: &mut Peripherals<O, D, B>,
        power: &mut PowerManager,
    ) where
        O: OutputDevice,
        D: DisplaySurface,
        B: SatelliteBus,
    {
        if pressed {
            debug!("macro '{}' press ({} steps)", binding.label, binding.sequence.len());
            for instruction in &binding.sequence {
                self.press(instruction, hw, power).await;
            }
        } else {
            debug!("macro '{}' release", binding.label);
            for instruction in &binding.sequence {
                release(instruction, hw);
            }
            hw.consumer_release();
            if key < GRID_KEYS {
                hw.display.set_key_color(key, binding.color);
            }
        }
    }

    async fn press<O, D, B>(
        &mut self,
        instruction: &Instruction,
        hw: &mut Peripherals<O, D, B>,
        power: &mut PowerManager,
    ) where
        O: OutputDevice,
        D: DisplaySurface,
        B: SatelliteBus,
    {
        match instruction {
            Instruction::KeyPress(code) => hw.output.press(*code),
            Instruction::KeyRelease(code) => hw.output.release(*code),
            Instruction::Delay(duration) => tokio::time::sleep(*duration).await,
            Instruction::TypeText(text) => hw.output.type_text(text),
            Instruction::ConsumerBatch(steps) => {
                for step in steps {
                    match step {
                        ConsumerStep::Press(code) => hw.consumer_press(*code),
                        ConsumerStep::Release => hw.consumer_release(),
                        ConsumerStep::Delay(duration) => tokio::time::sleep(*duration).await,
                    }
                }
            }
            Instruction::Pointer(action) => {
                match action.buttons {
                    Some(b) if b >= 0 => hw.output.pointer_press(b as u8),
                    Some(b) => hw.output.pointer_release(b.unsigned_abs() as u8),
                    None => {}
                }
                if action.moves() {
                    hw.output.pointer_move(action.dx, action.dy, action.wheel);
                }
                match action.tone {
                    Some(freq) if freq > 0 => hw.output.start_tone(freq as u32),
                    Some(_) => hw.output.stop_tone(),
                    None => {}
                }
                if let Some(path) = &action.play {
                    hw.output.play_audio(path);
                }
            }
            Instruction::Command(cmd) => command::dispatch(cmd, power, hw),
            Instruction::Unsupported(what) => {
                self.skipped += 1;
                debug!("skipping unsupported instruction: {what}");
            }
        }
    }
}

/// Undo whatever a press left held. Only presses are undone.
fn release<O, D, B>(instruction: &Instruction, hw: &mut Peripherals<O, D, B>)
where
    O: OutputDevice,
    D: DisplaySurface,
    B: SatelliteBus,
{
    match instruction {
        Instruction::KeyPress(code) => hw.output.release(*code),
        Instruction::Pointer(action) => {
            if let Some(b) = action.buttons.filter(|b| *b >= 0) {
                hw.output.pointer_release(b as u8);
            }
            if action.tone.is_some() {
                hw.output.stop_tone();
            }
        }
        _ => {}
    }
}
