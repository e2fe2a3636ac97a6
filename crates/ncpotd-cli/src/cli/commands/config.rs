//! `ncpotd config` – show, validate and edit the settings file.

use anyhow::{bail, Result};
use ncpotd_core::config::{ConfigEditor, ConfigField};
use std::path::Path;

pub fn run_config_show(path: &Path) -> Result<()> {
    let editor = ConfigEditor::open(path)?;
    print!("{}", render_settings(&editor));
    Ok(())
}

pub fn run_config_validate(path: &Path) -> Result<()> {
    let editor = ConfigEditor::open(path)?;
    let problem = editor.validate();
    if !problem.is_empty() {
        bail!("{}", problem);
    }
    println!("Configuration is valid.");
    Ok(())
}

/// Sets one field and saves. Returns whether the stored value changed.
pub fn run_config_set(path: &Path, field: ConfigField, value: &str) -> Result<bool> {
    let mut editor = ConfigEditor::open(path)?;
    let changed = editor.set_field(field, value)?;
    if changed {
        editor.save()?;
        println!("{} = {}", field, editor.display_value(field));
    } else {
        println!("{} unchanged", field);
    }

    let problem = editor.validate();
    if !problem.is_empty() {
        eprintln!("warning: {}", problem);
    }
    Ok(changed)
}

pub(crate) fn render_settings(editor: &ConfigEditor) -> String {
    let mut out = format!("# {}\n", editor.path().display());
    for field in ConfigField::ALL {
        out.push_str(&format!("{:<13} {}\n", field.key(), editor.display_value(field)));
    }
    out
}
