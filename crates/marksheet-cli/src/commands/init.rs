//! The `marksheet init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("marksheet.toml");
    if path.exists() {
        println!("marksheet.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created marksheet.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit marksheet.toml to choose where marks are stored");
    println!("  2. Run: marksheet add-subject --name Maths");
    println!("  3. Run: marksheet add-mark --subject 1 --value 8");
    println!("  4. Run: marksheet show");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# marksheet configuration

# Where the roster and theme are stored (one file per key).
data_dir = "./marksheet-data"

# Theme used until one is chosen: "light" or "dark".
default_theme = "light"

# Storage keys.
roster_key = "student-subjects"
theme_key = "app-theme"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    use marksheet_store::MarksheetConfig;

    #[test]
    fn sample_config_parses() {
        let config: MarksheetConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.data_dir, std::path::PathBuf::from("./marksheet-data"));
        assert_eq!(config.roster_key, "student-subjects");
    }
}
