use crate::config::{GlobalConfig, ProjectFile};
use crate::error::Result;

pub fn run() -> Result<()> {
    let dir = crate::commands::working_dir()?;
    let config = GlobalConfig::load()?;

    match ProjectFile::load(&dir)? {
        Some(file) => {
            println!("project: {}", file.project);
            println!("remote:  {}", file.remote());
        }
        None => {
            println!("project: (not attached)");
            println!("remote:  {} (default)", config.remote());
        }
    }
    Ok(())
}
