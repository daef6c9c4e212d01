use dockhand_runtime::RemoteConfig;

use crate::config::GlobalConfig;
use crate::error::Result;

pub fn run(target: Option<String>) -> Result<()> {
    let mut config = GlobalConfig::load()?;
    match target {
        Some(spec) => {
            let remote = RemoteConfig::parse(&spec);
            config.set_remote(&remote);
            config.save()?;
            println!("default remote set to {remote}");
        }
        None => println!("{}", config.remote()),
    }
    Ok(())
}
