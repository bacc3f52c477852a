// ─── server.properties ───
// Line-preserving editor for the flat `key=value` file the server writes on
// first run.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::error::{MinemError, MinemResult};

/// One well-formed `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    /// Zero-based line index in the file.
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// A properties file held as its original lines, terminators included, so
/// that untouched lines are written back byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesFile {
    lines: Vec<String>,
}

fn property_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^([0-9a-z\-.]+)=([0-9a-z ]*)$").expect("valid property pattern")
    })
}

fn value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^[0-9a-z ]*$").expect("valid value pattern"))
}

/// Whether `value` can be written and still be read back as a property.
pub fn is_valid_value(value: &str) -> bool {
    value_pattern().is_match(value)
}

fn parse_line(raw: &str) -> Option<(&str, &str)> {
    let content = raw.trim_end_matches(['\n', '\r']);
    if content.trim_start().starts_with('#') {
        return None;
    }
    let caps = property_pattern().captures(content)?;
    let key = caps.get(1)?.as_str();
    let value = caps.get(2).map_or("", |m| m.as_str());
    Some((key, value))
}

impl PropertiesFile {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub async fn load(path: &Path) -> MinemResult<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MinemError::io(path, e))?;
        Ok(Self::parse(&text))
    }

    pub async fn save(&self, path: &Path) -> MinemResult<()> {
        tokio::fs::write(path, self.render())
            .await
            .map_err(|e| MinemError::io(path, e))
    }

    /// Every well-formed property, in file order. Comments and lines that do
    /// not match `key=value` are skipped.
    pub fn entries(&self) -> Vec<PropertyLine> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(line, raw)| {
                parse_line(raw).map(|(key, value)| PropertyLine {
                    line,
                    key: key.to_string(),
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Value of the first line whose key matches.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lines
            .iter()
            .filter_map(|raw| parse_line(raw))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    }

    /// Replace the first matching line with `key=value`, keeping its line
    /// terminator. Other lines are left as they are.
    ///
    /// Values outside the property grammar are rejected before any change,
    /// since the rewritten line would no longer parse.
    pub fn set(&mut self, key: &str, value: &str) -> MinemResult<()> {
        if !is_valid_value(value) {
            return Err(MinemError::InvalidSettingValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        let index = self
            .lines
            .iter()
            .position(|raw| matches!(parse_line(raw), Some((k, _)) if k == key))
            .ok_or_else(|| MinemError::SettingNotFound(key.to_string()))?;

        let raw = &self.lines[index];
        let content_len = raw.trim_end_matches(['\n', '\r']).len();
        let terminator = raw[content_len..].to_string();
        self.lines[index] = format!("{key}={value}{terminator}");
        Ok(())
    }

    pub fn render(&self) -> String {
        self.lines.concat()
    }
}

/// Read `key` from the properties file at `path`.
pub async fn get_property(path: &Path, key: &str) -> MinemResult<Option<String>> {
    Ok(PropertiesFile::load(path).await?.get(key))
}

/// Set `key` in the properties file at `path`. Nothing is written when the
/// key is absent.
pub async fn set_property(path: &Path, key: &str, value: &str) -> MinemResult<()> {
    let mut file = PropertiesFile::load(path).await?;
    file.set(key, value)?;
    file.save(path).await?;
    debug!("Set {}={} in {:?}", key, value, path);
    Ok(())
}

pub async fn list_properties(path: &Path) -> MinemResult<Vec<PropertyLine>> {
    Ok(PropertiesFile::load(path).await?.entries())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#Minecraft server properties\n\
                          #Sat Aug 05 12:00:00 UTC 2023\n\
                          gamemode=survival\n\
                          motd=A Minecraft Server\n\
                          level-seed=\n\
                          broken line\n\
                          max-players=20\n";

    #[test]
    fn set_replaces_only_the_matched_line() {
        let mut file = PropertiesFile::parse("gamemode=survival\nmotd=hi\n");
        file.set("gamemode", "creative").unwrap();
        assert_eq!(file.render(), "gamemode=creative\nmotd=hi\n");
    }

    #[test]
    fn get_skips_comments_and_malformed_lines() {
        let file = PropertiesFile::parse(SAMPLE);
        assert_eq!(file.get("gamemode").as_deref(), Some("survival"));
        assert_eq!(file.get("motd").as_deref(), Some("A Minecraft Server"));
        assert_eq!(file.get("level-seed").as_deref(), Some(""));
        assert_eq!(file.get("broken"), None);
        assert_eq!(file.get("#Minecraft server properties"), None);
    }

    #[test]
    fn first_match_wins() {
        let mut file = PropertiesFile::parse("pvp=true\npvp=false\n");
        assert_eq!(file.get("pvp").as_deref(), Some("true"));
        file.set("pvp", "false").unwrap();
        assert_eq!(file.render(), "pvp=false\npvp=false\n");
    }

    #[test]
    fn set_unknown_key_fails() {
        let mut file = PropertiesFile::parse(SAMPLE);
        let err = file.set("difficulty", "hard").unwrap_err();
        assert!(matches!(err, MinemError::SettingNotFound(k) if k == "difficulty"));
        assert_eq!(file.render(), SAMPLE);
    }

    #[test]
    fn set_rejects_values_that_would_not_read_back() {
        let mut file = PropertiesFile::parse("gamemode=survival\nmotd=hi\n");

        let err = file.set("motd", "Welcome, friends!").unwrap_err();
        assert!(matches!(err, MinemError::InvalidSettingValue { key, .. } if key == "motd"));
        assert_eq!(file.render(), "gamemode=survival\nmotd=hi\n");

        file.set("motd", "Welcome friends").unwrap();
        assert_eq!(file.get("motd").as_deref(), Some("Welcome friends"));
        file.set("motd", "hi").unwrap();
        assert_eq!(file.get("motd").as_deref(), Some("hi"));
    }

    #[test]
    fn crlf_terminators_and_missing_final_newline_survive() {
        let mut file = PropertiesFile::parse("pvp=true\r\nmotd=hi");
        file.set("motd", "hello").unwrap();
        file.set("pvp", "false").unwrap();
        assert_eq!(file.render(), "pvp=false\r\nmotd=hello");
    }

    #[test]
    fn entries_list_well_formed_lines_in_order() {
        let keys: Vec<_> = PropertiesFile::parse(SAMPLE)
            .entries()
            .into_iter()
            .map(|p| (p.line, p.key))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2, "gamemode".to_string()),
                (3, "motd".to_string()),
                (4, "level-seed".to_string()),
                (6, "max-players".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn set_then_get_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");
        std::fs::write(&path, SAMPLE).unwrap();

        set_property(&path, "max-players", "50").await.unwrap();
        assert_eq!(
            get_property(&path, "max-players").await.unwrap().as_deref(),
            Some("50")
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            SAMPLE.replace("max-players=20", "max-players=50")
        );
    }

    #[tokio::test]
    async fn set_missing_key_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");
        std::fs::write(&path, SAMPLE).unwrap();
        let before = std::fs::metadata(&path).unwrap().modified().unwrap();

        let err = set_property(&path, "view-distance", "12").await.unwrap_err();
        assert!(matches!(err, MinemError::SettingNotFound(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), before);
    }

    #[tokio::test]
    async fn invalid_value_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.properties");
        std::fs::write(&path, SAMPLE).unwrap();

        let err = set_property(&path, "level-seed", "-4172144997902289642")
            .await
            .unwrap_err();
        assert!(matches!(err, MinemError::InvalidSettingValue { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
        assert_eq!(
            get_property(&path, "level-seed").await.unwrap().as_deref(),
            Some("")
        );
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = get_property(&dir.path().join("server.properties"), "motd")
            .await
            .unwrap_err();
        assert!(matches!(err, MinemError::Io { .. }));
    }
}
