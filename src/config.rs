use std::env;
use std::path::PathBuf;

/// Which persistence backend the process runs against. Chosen once at
/// startup; everything downstream only sees the `TodoStore` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    File,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::File => "file",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub data_dir: PathBuf,
    /// Candidate Postgres connection strings in priority order,
    /// deduplicated, empties removed. May be empty — the store then
    /// fails every call with a distinguished error instead of dialing.
    pub database_urls: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "file" => StorageBackend::File,
            other => anyhow::bail!(
                "Invalid STORAGE_BACKEND {:?}: expected \"postgres\" or \"file\"",
                other
            ),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            storage_backend,
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".into())
                .into(),
            database_urls: connection_candidates(&[
                env::var("POSTGRES_URL_NON_POOLING").ok(),
                env::var("DATABASE_URL_UNPOOLED").ok(),
                env::var("DATABASE_URL").ok(),
                env::var("POSTGRES_URL").ok(),
            ]),
        })
    }

    /// Path of the JSON file the file-backed store persists to.
    pub fn todo_file_path(&self) -> PathBuf {
        self.data_dir.join("todos.json")
    }
}

/// Collapse the ordered candidate env values into a deduplicated list,
/// keeping priority order and dropping empty strings.
pub fn connection_candidates(values: &[Option<String>]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.iter().flatten() {
        if value.is_empty() || out.iter().any(|seen| seen == value) {
            continue;
        }
        out.push(value.clone());
    }
    out
}
