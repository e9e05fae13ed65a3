pub mod admin;
pub mod compress;
pub mod delete;
pub mod history;
pub mod stats;
pub mod version;

use compressx_core::{Backend, Config, Session};
use compressx_store::{FileStore, KeyValueStore, Paths, SqliteStore, UserId};

/// Everything a command needs: where data lives, configuration and the acting user
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub user: UserId,
}

impl Context {
    /// Resolve `~/.compressx` and load its configuration
    pub fn load(user: &str) -> anyhow::Result<Self> {
        Self::with_paths(Paths::new()?, user)
    }

    pub fn with_paths(paths: Paths, user: &str) -> anyhow::Result<Self> {
        let config = Config::load(&paths.config_file())?;
        let user = UserId::new(user)?;
        Ok(Self {
            paths,
            config,
            user,
        })
    }

    pub fn open_store(&self) -> anyhow::Result<Box<dyn KeyValueStore>> {
        let store: Box<dyn KeyValueStore> = match self.config.backend {
            Backend::File => Box::new(FileStore::new(self.paths.data_dir())),
            Backend::Sqlite => Box::new(SqliteStore::new(&self.paths.database())?),
        };
        Ok(store)
    }
}

/// Open the acting user's session on `store`
pub fn open_session<'a>(
    ctx: &Context,
    store: &'a mut dyn KeyValueStore,
) -> anyhow::Result<Session<'a>> {
    Session::open(store, ctx.user.clone())
}
