use super::command::SpecialCommand;
use crate::config::schema::{RawBatchItem, RawStep, RawTable};
use std::path::PathBuf;
use std::time::Duration;

/// One decoded macro step.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    KeyPress(u16),
    KeyRelease(u16),
    Delay(Duration),
    TypeText(String),
    ConsumerBatch(Vec<ConsumerStep>),
    Pointer(PointerAction),
    Command(SpecialCommand),
    /// Shape not understood; skipped at execution.
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerStep {
    Press(u16),
    Release,
    Delay(Duration),
}

/// Pointer buttons and motion, tone and audio playback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerAction {
    /// Button mask; negative releases `|buttons|`.
    pub buttons: Option<i32>,
    pub dx: i32,
    pub dy: i32,
    pub wheel: i32,
    /// Tone frequency in Hz; zero or negative stops the tone.
    pub tone: Option<i32>,
    pub play: Option<PathBuf>,
}

impl PointerAction {
    pub fn moves(&self) -> bool {
        self.dx != 0 || self.dy != 0 || self.wheel != 0
    }
}

impl From<RawStep> for Instruction {
    fn from(raw: RawStep) -> Self {
        match raw {
            RawStep::Code(n) => key_code(n),
            RawStep::Seconds(s) => match Duration::try_from_secs_f64(s) {
                Ok(d) => Self::Delay(d),
                Err(_) => Self::Unsupported(format!("delay {s}")),
            },
            RawStep::Text(text) => Self::TypeText(text),
            RawStep::Batch(items) => {
                Self::ConsumerBatch(items.into_iter().filter_map(consumer_step).collect())
            }
            RawStep::Table(table) => from_table(table),
            RawStep::Other(value) => Self::Unsupported(value.type_str().to_string()),
        }
    }
}

fn key_code(n: i64) -> Instruction {
    match u16::try_from(n.unsigned_abs()) {
        Ok(code) if n >= 0 => Instruction::KeyPress(code),
        Ok(code) => Instruction::KeyRelease(code),
        Err(_) => Instruction::Unsupported(format!("key code {n}")),
    }
}

fn consumer_step(item: RawBatchItem) -> Option<ConsumerStep> {
    match item {
        RawBatchItem::Code(n) if n < 0 => Some(ConsumerStep::Release),
        RawBatchItem::Code(n) => u16::try_from(n).ok().map(ConsumerStep::Press),
        RawBatchItem::Seconds(s) => Duration::try_from_secs_f64(s).ok().map(ConsumerStep::Delay),
        RawBatchItem::Other(_) => None,
    }
}

fn from_table(table: RawTable) -> Instruction {
    if let Some(name) = &table.test_string {
        return Instruction::Command(SpecialCommand::parse(name));
    }

    let has_pointer_keys = table.buttons.is_some()
        || table.x.is_some()
        || table.y.is_some()
        || table.wheel.is_some()
        || table.tone.is_some()
        || table.play.is_some();
    if !has_pointer_keys {
        return Instruction::Unsupported("empty table".to_string());
    }

    match pointer_action(table) {
        Some(action) => Instruction::Pointer(action),
        None => Instruction::Unsupported("pointer value out of range".to_string()),
    }
}

fn pointer_action(table: RawTable) -> Option<PointerAction> {
    let small = |v: Option<i64>| v.map(i32::try_from).transpose().ok();
    let buttons = small(table.buttons)?;
    if buttons.is_some_and(|b| b.unsigned_abs() > u32::from(u8::MAX)) {
        return None;
    }
    Some(PointerAction {
        buttons,
        dx: small(table.x)?.unwrap_or(0),
        dy: small(table.y)?.unwrap_or(0),
        wheel: small(table.wheel)?.unwrap_or(0),
        tone: small(table.tone)?,
        play: table.play.map(PathBuf::from),
    })
}
