//! Task token parsing.
//!
//! A task token has the form `name[:arg[,arg...]]` where each `arg` is either
//! a bare value or `key=value`. A backslash escapes a literal `,`, `=` or `\`
//! inside an argument.

use crate::error::{DeployError, Result};

/// One task token split into its name and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTask {
    /// Task name.
    pub name: String,
    /// Bare arguments in order.
    pub positional: Vec<String>,
    /// `key=value` arguments in order.
    pub keywords: Vec<(String, String)>,
}

/// Parse a single task token.
///
/// # Example
///
/// ```
/// use gaedeploy::invocation::parse_task_token;
///
/// let raw = parse_task_token("deploy:tag=1,export").unwrap();
/// assert_eq!(raw.name, "deploy");
/// assert_eq!(raw.keywords, vec![("tag".to_string(), "1".to_string())]);
/// assert_eq!(raw.positional, vec!["export".to_string()]);
/// ```
pub fn parse_task_token(token: &str) -> Result<RawTask> {
    let (name, args) = match token.split_once(':') {
        Some((name, args)) => (name, Some(args)),
        None => (token, None),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(DeployError::InvalidTask {
            task: token.to_string(),
            message: "task name is empty".to_string(),
        });
    }

    let mut raw = RawTask {
        name: name.to_string(),
        ..Default::default()
    };

    let Some(args) = args else {
        return Ok(raw);
    };

    if args.is_empty() {
        return Err(DeployError::InvalidTask {
            task: name.to_string(),
            message: "expected arguments after ':'".to_string(),
        });
    }

    for arg in split_args(args, name)? {
        match arg.key {
            Some(key) => {
                if key.is_empty() {
                    return Err(DeployError::InvalidTask {
                        task: name.to_string(),
                        message: format!("argument '={}' has no name", arg.value),
                    });
                }
                raw.keywords.push((key, arg.value));
            }
            None => raw.positional.push(arg.value),
        }
    }

    Ok(raw)
}

struct Arg {
    key: Option<String>,
    value: String,
}

/// Split the argument list on unescaped commas and the first unescaped `=`.
fn split_args(args: &str, task: &str) -> Result<Vec<Arg>> {
    let mut out = Vec::new();
    let mut key: Option<String> = None;
    let mut buf = String::new();
    let mut chars = args.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => buf.push(escaped),
                None => {
                    return Err(DeployError::InvalidTask {
                        task: task.to_string(),
                        message: "dangling '\\' at end of arguments".to_string(),
                    })
                }
            },
            '=' if key.is_none() => key = Some(std::mem::take(&mut buf)),
            ',' => out.push(Arg {
                key: key.take(),
                value: std::mem::take(&mut buf),
            }),
            _ => buf.push(c),
        }
    }
    out.push(Arg { key, value: buf });

    if out.iter().any(|a| a.key.is_none() && a.value.is_empty()) {
        return Err(DeployError::InvalidTask {
            task: task.to_string(),
            message: "empty argument".to_string(),
        });
    }

    Ok(out)
}
