use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    io::{self, BufRead},
    path::PathBuf,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use slip_config::Config;
use slip_domain::Category;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;
use crate::cli::registry::CommandRegistry;
use crate::cli::shell_context::SCRIPT_ENV;

const HISTORY_FILE: &str = "history.txt";

/// Runs the Slip shell, reading commands from stdin when `SLIP_CLI_SCRIPT` is set.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_registry(&context.registry)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history_path = context.data_dir.join(HISTORY_FILE);
    if history_path.exists() {
        if let Err(err) = editor.load_history(&history_path) {
            tracing::warn!(path = %history_path.display(), error = %err, "Ignoring unreadable shell history");
        }
    }
    output_info("Type `help` to list commands, Tab to complete.");

    while context.running {
        let prompt = context.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output_info("Goodbye.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    save_history(&mut editor, history_path);
    Ok(())
}

fn save_history(editor: &mut Editor<CommandHelper, DefaultHistory>, path: PathBuf) {
    if let Err(err) = editor.save_history(&path) {
        tracing::warn!(path = %path.display(), error = %err, "Could not save shell history");
    }
}

/// Executes stdin line by line. Failed commands are reported and skipped.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut failures = 0usize;
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                failures += 1;
                context.report_error(err)?;
            }
        }
    }
    tracing::debug!(failures, "Script finished");
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not parse line: {err}"));
            return Ok(LoopControl::Continue);
        }
    };

    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if raw.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let outcome = context.dispatch(&command, raw, &args);
    if matches!(outcome, Ok(LoopControl::Exit)) {
        context.running = false;
    }
    outcome
}

/// What the line editor knows about one command.
struct CommandShape {
    usage_tail: String,
    flags: Vec<&'static str>,
}

/// Completes command names, their flags, and well-known argument values,
/// and hints at a command's usage once its name is typed.
struct CommandHelper {
    names: Vec<&'static str>,
    shapes: HashMap<&'static str, CommandShape>,
}

impl CommandHelper {
    fn from_registry(registry: &CommandRegistry) -> Self {
        let mut names: Vec<&'static str> = registry.names().collect();
        names.sort_unstable();
        names.dedup();

        let mut shapes = HashMap::new();
        for entry in registry.list() {
            let usage_tail = entry
                .usage
                .strip_prefix(entry.name)
                .unwrap_or_default()
                .trim_start()
                .to_string();
            for key in std::iter::once(entry.name).chain(entry.aliases.iter().copied()) {
                shapes.insert(
                    key,
                    CommandShape {
                        usage_tail: usage_tail.clone(),
                        flags: entry.flags.to_vec(),
                    },
                );
            }
        }
        Self { names, shapes }
    }

    fn shape_of(&self, word: &str) -> Option<&CommandShape> {
        self.shapes.get(word.to_ascii_lowercase().as_str())
    }

    /// Candidate values for the word being typed, given the words before it.
    fn candidates(&self, words: &[&str], needle: &str) -> Vec<String> {
        let Some((&first, previous)) = words.split_first() else {
            return matching(self.names.iter().copied(), needle);
        };
        let Some(shape) = self.shape_of(first) else {
            return Vec::new();
        };

        if previous.last() == Some(&"--category") {
            let keys = std::iter::once("all").chain(Category::ALL.iter().map(|c| c.key()));
            return matching(keys, needle);
        }
        if needle.starts_with("--") {
            return matching(shape.flags.iter().copied(), needle);
        }
        if !previous.is_empty() {
            return Vec::new();
        }
        match first.to_ascii_lowercase().as_str() {
            "export" => matching(["json", "csv"], needle),
            "config" => matching(Config::KEYS, needle),
            "help" => matching(self.names.iter().copied(), needle),
            _ => Vec::new(),
        }
    }
}

fn matching<'a>(options: impl IntoIterator<Item = &'a str>, needle: &str) -> Vec<String> {
    let needle = needle.to_ascii_lowercase();
    options
        .into_iter()
        .filter(|option| option.starts_with(&needle))
        .map(str::to_string)
        .collect()
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let words: Vec<&str> = prefix[..start].split_whitespace().collect();

        let candidates = self
            .candidates(&words, &prefix[start..])
            .into_iter()
            .map(|value| Pair {
                display: value.clone(),
                replacement: value,
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos != line.len() {
            return None;
        }
        let word = line.strip_suffix(' ')?;
        if word.contains(char::is_whitespace) {
            return None;
        }
        let shape = self.shape_of(word)?;
        Some(shape.usage_tail.clone()).filter(|tail| !tail.is_empty())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn helper() -> CommandHelper {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        CommandHelper::from_registry(&registry)
    }

    #[test]
    fn command_lines_honour_quotes() {
        let tokens = parse_command_line("add --store \"Jaya Grocer\" --total 10").unwrap();
        assert_eq!(tokens, ["add", "--store", "Jaya Grocer", "--total", "10"]);
        assert!(parse_command_line("add --store \"unterminated").is_err());
    }

    #[test]
    fn completes_command_names_and_aliases() {
        let helper = helper();
        assert_eq!(helper.candidates(&[], "su"), ["summary"]);
        assert!(helper.candidates(&[], "").contains(&"ls".to_string()));
    }

    #[test]
    fn completes_arguments_from_context() {
        let helper = helper();
        assert_eq!(helper.candidates(&["export"], "c"), ["csv"]);
        assert_eq!(helper.candidates(&["list", "--category"], "fo"), ["food"]);
        assert_eq!(helper.candidates(&["ls", "--category"], "a"), ["all"]);
        assert_eq!(helper.candidates(&["delete"], "--y"), ["--yes"]);
        assert_eq!(helper.candidates(&["config"], "recent"), ["recent_count"]);
        assert!(helper.candidates(&["nonsense"], "").is_empty());
        assert!(helper.candidates(&["export", "csv"], "j").is_empty());
    }
}
