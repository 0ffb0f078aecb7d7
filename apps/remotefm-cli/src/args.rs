//! Command-line parsing.

use std::path::PathBuf;

use remotefm_view::SortOrder;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(Option<String>),
    Put { dir: String, locals: Vec<PathBuf> },
    Remove(String),
    Get { path: String, out: Option<PathBuf> },
}

/// Parsed command line: option overrides plus one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub endpoint: Option<String>,
    pub sort: Option<SortOrder>,
    pub command: Command,
}

impl Invocation {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
    }
}

/// Parses arguments (program name excluded).
pub fn parse(mut args: Vec<String>) -> Result<Invocation, String> {
    let endpoint = take_value(&mut args, &["--endpoint", "-e"])?;
    let sort = take_value(&mut args, &["--sort", "-s"])?
        .map(|s| parse_sort(&s))
        .transpose()?;

    if let Some(flag) = args.iter().find(|a| a.starts_with('-')) {
        return Err(format!("unknown option: {flag}"));
    }

    let mut positionals = args.into_iter();
    let command = match positionals.next().as_deref() {
        Some("ls") => Command::List(positionals.next()),
        Some("put") => {
            let dir = positionals.next().ok_or("put: missing DIR")?;
            let locals: Vec<PathBuf> = positionals.by_ref().map(PathBuf::from).collect();
            if locals.is_empty() {
                return Err("put: missing LOCAL".into());
            }
            Command::Put { dir, locals }
        }
        Some("rm") => Command::Remove(positionals.next().ok_or("rm: missing PATH")?),
        Some("get") => {
            let path = positionals.next().ok_or("get: missing PATH")?;
            Command::Get {
                path,
                out: positionals.next().map(PathBuf::from),
            }
        }
        Some(other) => return Err(format!("unknown command: {other}")),
        None => return Err("missing command".into()),
    };

    if let Some(extra) = positionals.next() {
        return Err(format!("unexpected argument: {extra}"));
    }

    Ok(Invocation {
        endpoint,
        sort,
        command,
    })
}

fn take_value(args: &mut Vec<String>, names: &[&str]) -> Result<Option<String>, String> {
    let Some(i) = args.iter().position(|a| names.contains(&a.as_str())) else {
        return Ok(None);
    };
    if i + 1 >= args.len() {
        return Err(format!("{} needs a value", args[i]));
    }
    let value = args.remove(i + 1);
    args.remove(i);
    Ok(Some(value))
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    match value {
        "dirs-first" => Ok(SortOrder::DirectoriesFirst),
        "name" => Ok(SortOrder::Name),
        "none" => Ok(SortOrder::None),
        other => Err(format!("unknown sort order: {other}")),
    }
}
