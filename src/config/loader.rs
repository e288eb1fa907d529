use super::schema::MacroFile;
use crate::action::Instruction;
use crate::app::{Application, MAX_MACROS};
use crate::error::{PadError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Load every macro set in `folder`, ordered by file name.
///
/// Files that fail to parse or validate are logged and skipped, so the
/// result may be empty.
///
/// # Errors
/// Returns `PadError::Io` if the folder cannot be listed.
pub fn load_applications(folder: &Path) -> Result<Vec<Application>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(folder)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_macro_file(path))
        .collect();
    files.sort();

    let mut apps = Vec::with_capacity(files.len());
    for path in &files {
        match load_macro_file(path) {
            Ok(app) => {
                debug!(
                    "loaded '{}' from {} ({} macros)",
                    app.name,
                    path.display(),
                    app.macros.len()
                );
                apps.push(app);
            }
            Err(e) => error!("skipping {e}"),
        }
    }

    info!(
        "loaded {} of {} macro files from {}",
        apps.len(),
        files.len(),
        folder.display()
    );
    Ok(apps)
}

/// Parse and validate a single macro set file.
///
/// # Errors
/// Returns `PadError::Io` on read errors or `PadError::MacroFile` on syntax
/// or validation failures.
pub fn load_macro_file(path: &Path) -> Result<Application> {
    let content = std::fs::read_to_string(path)?;
    let file: MacroFile = toml::from_str(&content).map_err(|e| PadError::MacroFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if file.macros.len() > MAX_MACROS {
        return Err(PadError::MacroFile {
            path: path.to_path_buf(),
            message: format!("{} macros, at most {MAX_MACROS} allowed", file.macros.len()),
        });
    }

    let app = Application::from(file);
    let unsupported = app
        .macros
        .iter()
        .flat_map(|m| &m.sequence)
        .filter(|i| matches!(i, Instruction::Unsupported(_)))
        .count();
    if unsupported > 0 {
        debug!("{}: {unsupported} unsupported steps will be skipped", path.display());
    }
    Ok(app)
}

fn is_macro_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file()
        && !name.starts_with("._")
        && path.extension().is_some_and(|ext| ext == "toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::consumer;

    const MEDIA: &str = r##"
name = "Media"

[[macros]]
color = 0x680017
label = "<<"
sequence = [[0xB6]]

[[macros]]
color = "#73000b"
label = "Play"
sequence = [[0xCD]]
"##;

    #[test]
    fn loads_sorted_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_media.toml"), MEDIA).unwrap();
        std::fs::write(dir.path().join("a_keys.toml"), "name = \"Keys\"\n[[macros]]\nsequence = [58]\n").unwrap();
        std::fs::write(dir.path().join("c_broken.toml"), "name = ").unwrap();
        std::fs::write(dir.path().join("._b_media.toml"), MEDIA).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a macro set").unwrap();

        let apps = load_applications(dir.path()).unwrap();
        let names: Vec<&str> = apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Keys", "Media"]);
        assert_eq!(
            apps[1].macros[1].sequence,
            vec![Instruction::ConsumerBatch(vec![
                crate::action::ConsumerStep::Press(consumer::PLAY_PAUSE)
            ])]
        );
    }

    #[test]
    fn non_ascii_color_skips_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_good.toml"), MEDIA).unwrap();
        std::fs::write(
            dir.path().join("b_bad.toml"),
            "name = \"Bad\"\n[[macros]]\ncolor = \"#a\u{e9}\"\n",
        )
        .unwrap();

        let apps = load_applications(dir.path()).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Media");
        assert!(matches!(
            load_macro_file(&dir.path().join("b_bad.toml")),
            Err(PadError::MacroFile { .. })
        ));
    }

    #[test]
    fn rejects_too_many_macros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.toml");
        let mut doc = String::from("name = \"Big\"\n");
        for _ in 0..14 {
            doc.push_str("[[macros]]\nlabel = \"x\"\n");
        }
        std::fs::write(&path, doc).unwrap();
        assert!(matches!(
            load_macro_file(&path),
            Err(PadError::MacroFile { .. })
        ));
    }

    #[test]
    fn missing_folder_is_an_error() {
        assert!(matches!(
            load_applications(Path::new("/nonexistent/padd/macros")),
            Err(PadError::Io(_))
        ));
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_applications(dir.path()).unwrap().is_empty());
    }
}
