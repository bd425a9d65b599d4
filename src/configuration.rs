use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_settings: ApiSettings,
    #[serde(default)]
    pub panel_settings: PanelSettings,
}

#[derive(Debug, Deserialize)]
pub struct ApiSettings {
    pub api_base_url: String,
}

impl ApiSettings {
    pub fn new(url: &str) -> Self {
        Self {
            api_base_url: url.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PanelSettings {
    /// Language used when the user never picked one.
    #[serde(default)]
    pub default_language: Option<String>,
}

pub fn get_configuration(cfg_file: &str) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(cfg_file, config::FileFormat::Yaml))
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub moozi_db: PathBuf,
}

impl ConfigFolder {
    pub fn new() -> Result<Self, env::VarError> {
        let home_dir = env::var("HOME")?;
        Ok(Self::in_dir(Path::new(&home_dir)))
    }

    pub fn in_dir(home_dir: &Path) -> Self {
        let config_dir = home_dir.join(".moozi");

        Self {
            config_file: config_dir.join("config.yaml"),
            moozi_db: config_dir.join("moozi_db"),
            config_dir,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.config_dir.exists() && self.config_file.exists()
    }
}

pub fn create_config(cfg_folder: ConfigFolder) -> Result<(), Box<dyn std::error::Error>> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");
    let config_dir = &cfg_folder.config_dir;

    if config_dir.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    write_config_template(&cfg_folder)?;

    println!("\x1b[32mConfiguration folder created at:");
    println!("  -> ~/.moozi");
    println!("Configuration file created at:");
    println!("  -> ~/.moozi/config.yaml");
    println!("moozi_db folder created at:");
    println!("  -> ~/.moozi/moozi_db");
    println!("\x1b[0mPlease edit the configuration file to point at your translation backend.");

    Ok(())
}

fn write_config_template(cfg_folder: &ConfigFolder) -> io::Result<()> {
    fs::create_dir_all(&cfg_folder.config_dir)?;
    fs::create_dir_all(&cfg_folder.moozi_db)?;

    let config_content = include_str!("config_template.yaml");
    fs::write(&cfg_folder.config_file, config_content)
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration folder already exists.");
    println!("Do you want to overwrite it? Stored selections will be kept. (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_folder_layout() {
        let folder = ConfigFolder::in_dir(Path::new("/home/someone"));
        assert_eq!(folder.config_dir, Path::new("/home/someone/.moozi"));
        assert_eq!(folder.config_file, Path::new("/home/someone/.moozi/config.yaml"));
        assert_eq!(folder.moozi_db, Path::new("/home/someone/.moozi/moozi_db"));
    }

    #[test]
    fn test_template_parses() {
        let temp_dir = TempDir::new().unwrap();
        let folder = ConfigFolder::in_dir(temp_dir.path());
        assert!(!folder.is_initialized());

        write_config_template(&folder).unwrap();
        assert!(folder.is_initialized());

        let settings = get_configuration(folder.config_file.to_str().unwrap()).unwrap();
        assert_eq!(settings.api_settings.api_base_url, "http://localhost:3001");
        assert_eq!(settings.panel_settings.default_language, None);
    }

    #[test]
    fn test_panel_settings_are_optional() {
        let temp_dir = TempDir::new().unwrap();
        let cfg_file = temp_dir.path().join("config.yaml");
        fs::write(
            &cfg_file,
            "api_settings:\n  api_base_url: \"https://translate.example\"\n",
        )
        .unwrap();

        let settings = get_configuration(cfg_file.to_str().unwrap()).unwrap();
        assert_eq!(settings.api_settings.api_base_url, "https://translate.example");
        assert!(settings.panel_settings.default_language.is_none());
    }
}
