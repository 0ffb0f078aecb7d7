//! Command execution: wires the HTTP remote, console surface and panel.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use remotefm_panel::FileManager;
use remotefm_protocol::paths::{ensure_trailing_slash, last_segment, parent_dir};
use remotefm_remote::{HttpRemote, RemoteApi};
use remotefm_upload::{EntryHandle, FsEntry, TransferSummary};

use crate::args::Command;
use crate::config::Config;
use crate::console::{ConsoleSurface, format_entry};

/// Runs one command against the configured endpoint.
pub async fn run(config: Config, command: Command) -> anyhow::Result<()> {
    let remote = HttpRemote::with_timeout(
        &config.endpoint,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    execute(Arc::new(remote), &config, command).await
}

/// Executes `command` against any remote.
pub async fn execute(
    remote: Arc<dyn RemoteApi>,
    config: &Config,
    command: Command,
) -> anyhow::Result<()> {
    let console = Arc::new(ConsoleSurface::default());
    let fm = FileManager::builder(remote, console.clone())
        .status(console.clone())
        .sort(config.sort)
        .build();
    tracing::debug!(panel = fm.id(), "panel ready");

    match command {
        Command::List(dir) => {
            let dir = dir.unwrap_or_else(|| config.start_path.clone());
            fm.navigate(&dir)
                .await
                .with_context(|| format!("cannot list {dir}"))?;
            for node in fm.children() {
                println!("{}", format_entry(&node));
            }
        }
        Command::Put { dir, locals } => {
            fm.navigate(&dir)
                .await
                .with_context(|| format!("cannot open {dir}"))?;
            let mut entries: Vec<Box<dyn EntryHandle>> = Vec::with_capacity(locals.len());
            for local in &locals {
                let entry = FsEntry::open(local)
                    .await
                    .with_context(|| format!("cannot open {}", local.display()))?;
                entries.push(Box::new(entry));
            }
            let summary = fm
                .on_drop(
                    entries,
                    &dir,
                    Some(Box::new(|s: &TransferSummary| {
                        tracing::info!(uploaded = s.uploaded, failed = s.failed, "upload finished");
                    })),
                )
                .await?;
            println!(
                "{} uploaded, {} failed, {} bytes",
                summary.uploaded, summary.failed, summary.bytes
            );
            if summary.failed > 0 {
                anyhow::bail!("{} entries failed", summary.failed);
            }
        }
        Command::Remove(path) => {
            let path = path.trim_end_matches('/').to_string();
            fm.navigate(&parent_dir(&ensure_trailing_slash(&path)))
                .await
                .with_context(|| format!("cannot open parent of {path}"))?;
            fm.on_delete_request(&path).await;
            if fm.node(&path).is_some() {
                anyhow::bail!("{path} still exists");
            }
            println!("deleted {path}");
        }
        Command::Get { path, out } => {
            fm.navigate(&parent_dir(&ensure_trailing_slash(&path)))
                .await
                .with_context(|| format!("cannot open parent of {path}"))?;
            fm.on_activate(&path).await?;
            let file_name = console
                .take_downloads()
                .pop()
                .map(|d| d.file_name)
                .unwrap_or_else(|| last_segment(&path).to_string());
            let out = out.unwrap_or_else(|| Path::new(&config.download_dir).join(&file_name));
            let bytes = fm.download(&path).await?;
            write_download(&out, &bytes).await?;
            println!("{} -> {} ({} bytes)", path, out.display(), bytes.len());
        }
    }
    Ok(())
}

async fn write_download(out: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(out, bytes)
        .await
        .with_context(|| format!("cannot write {}", out.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remotefm_remote::MemoryRemote;
    use std::fs;

    fn remote() -> Arc<MemoryRemote> {
        Arc::new(
            MemoryRemote::new()
                .with_file("/docs/a.txt", "hello")
                .with_dir("/docs/sub"),
        )
    }

    #[tokio::test]
    async fn put_uploads_local_tree() {
        let remote = remote();
        let local = tempfile::tempdir().unwrap();
        fs::create_dir(local.path().join("album")).unwrap();
        fs::write(local.path().join("album").join("x.jpg"), b"XX").unwrap();
        fs::write(local.path().join("b.txt"), b"B").unwrap();

        execute(
            remote.clone(),
            &Config::default(),
            Command::Put {
                dir: "/docs".into(),
                locals: vec![local.path().join("album"), local.path().join("b.txt")],
            },
        )
        .await
        .unwrap();

        assert_eq!(remote.file("/docs/album/x.jpg").unwrap(), b"XX");
        assert_eq!(remote.file("/docs/b.txt").unwrap(), b"B");
    }

    #[tokio::test]
    async fn get_writes_into_download_dir() {
        let out = tempfile::tempdir().unwrap();
        let config = Config {
            download_dir: out.path().display().to_string(),
            ..Config::default()
        };

        execute(
            remote(),
            &config,
            Command::Get {
                path: "/docs/a.txt".into(),
                out: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(fs::read(out.path().join("a.txt")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn rm_deletes_remote_path() {
        let remote = remote();
        execute(
            remote.clone(),
            &Config::default(),
            Command::Remove("/docs/sub/".into()),
        )
        .await
        .unwrap();
        assert!(!remote.exists("/docs/sub"));
        assert!(remote.exists("/docs/a.txt"));
    }

    #[tokio::test]
    async fn ls_of_a_file_fails() {
        let err = execute(
            remote(),
            &Config::default(),
            Command::List(Some("/docs/a.txt".into())),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("cannot list /docs/a.txt"));
    }
}
