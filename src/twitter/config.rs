use crate::{Error, Result};
use egg_mode::{KeyPair, Token};
use serde_derive::Deserialize;
use std::fs;
use std::path::Path;

/// Twitter API credentials, read from a TOML key file with `consumer` and `access` sections.
#[derive(Debug, Deserialize, Eq, PartialEq)]
pub struct Config {
    consumer: KeyConfig,
    access: AccessConfig,
}

#[derive(Debug, Deserialize, Eq, PartialEq)]
struct KeyConfig {
    key: String,
    secret: String,
}

#[derive(Debug, Deserialize, Eq, PartialEq)]
struct AccessConfig {
    token: String,
    secret: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// A user access token for signing requests.
    pub fn token(&self) -> Token {
        Token::Access {
            consumer: KeyPair::new(self.consumer.key.clone(), self.consumer.secret.clone()),
            access: KeyPair::new(self.access.token.clone(), self.access.secret.clone()),
        }
    }

    fn check_present(&self) -> Result<()> {
        let fields = [
            ("consumer.key", &self.consumer.key),
            ("consumer.secret", &self.consumer.secret),
            ("access.token", &self.access.token),
            ("access.secret", &self.access.secret),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(Error::MissingCredential(*name)),
            None => Ok(()),
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(input: &str) -> Result<Config> {
        let config = toml::from_str::<Config>(input)?;
        config.check_present()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE_CONFIG: &str = "[consumer]\nkey=\"ABC\"\nsecret=\"DEF\"\n\n[access]\ntoken=\"GHI\"\nsecret=\"JKL\"\n";

    #[test]
    fn parse_config() {
        let config = EXAMPLE_CONFIG.parse::<Config>().unwrap();
        let expected = Config {
            consumer: KeyConfig {
                key: "ABC".to_string(),
                secret: "DEF".to_string(),
            },
            access: AccessConfig {
                token: "GHI".to_string(),
                secret: "JKL".to_string(),
            },
        };

        assert_eq!(config, expected);
    }

    #[test]
    fn build_access_token() {
        let config = EXAMPLE_CONFIG.parse::<Config>().unwrap();

        match config.token() {
            Token::Access { consumer, access } => {
                assert_eq!(consumer.key, "ABC");
                assert_eq!(access.secret, "JKL");
            }
            Token::Bearer(_) => panic!("Expected an access token"),
        }
    }

    #[test]
    fn reject_missing_section() {
        let result = "[consumer]\nkey=\"ABC\"\nsecret=\"DEF\"\n".parse::<Config>();

        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn reject_empty_credential() {
        let input = EXAMPLE_CONFIG.replace("\"GHI\"", "\"\"");
        let result = input.parse::<Config>();

        assert!(matches!(
            result,
            Err(Error::MissingCredential("access.token"))
        ));
    }

    #[test]
    fn read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.consumer.key, "ABC");
    }

    #[test]
    fn missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("keys.toml"));

        assert!(matches!(result, Err(Error::ConfigRead(_))));
    }
}
