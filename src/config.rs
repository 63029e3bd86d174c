//! Command-line configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::server::DEFAULT_MAX_CONNECTIONS;
use crate::store::FileStore;

/// A minimal HTTP/1.1 server: echo, user-agent and file storage routes.
#[derive(Debug, Parser)]
#[command(name = "shoal", version, about)]
pub struct Config {
    /// Directory served and written under `/files/`.
    #[arg(long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:4221")]
    pub addr: SocketAddr,

    /// Maximum number of connections handled at once.
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: usize,
}

impl Config {
    /// Rejects a storage directory that does not exist or is not a directory,
    /// and a zero connection cap.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                return Err(Error::Config(format!(
                    "directory {} does not exist or is not a directory",
                    dir.display()
                )));
            }
        }
        if self.max_connections == 0 {
            return Err(Error::Config("max-connections must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// The file store rooted at `--directory`, if one was given.
    pub fn store(&self) -> Option<FileStore> {
        self.directory.clone().map(FileStore::new)
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["shoal"]).unwrap();
        assert_eq!(config.directory, None);
        assert_eq!(config.addr, "0.0.0.0:4221".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.validate().is_ok());
        assert!(config.store().is_none());
    }

    #[test]
    fn existing_directory_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let args: [OsString; 3] = ["shoal".into(), "--directory".into(), dir.path().into()];
        let config = Config::try_parse_from(args).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.store().unwrap().root(), dir.path());
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let config = Config {
            directory: Some(missing),
            addr: "127.0.0.1:0".parse().unwrap(),
            max_connections: 1,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn file_as_directory_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            directory: Some(file.path().to_owned()),
            addr: "127.0.0.1:0".parse().unwrap(),
            max_connections: 1,
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn zero_connections_is_rejected() {
        let config = Config::try_parse_from(["shoal", "--max-connections", "0"]).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
