/// A parsed line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    List,
    Search(String),
    Stats,
    Open(u32),
    Ask(String),
    Feedback,
    Rate(u8),
    Comment(String),
    Submit,
    Cancel,
    Transcript,
    Close,
    General(String),
    Help,
    Quit,
    /// Bare text, meaning depends on whether a session is open
    Text(String),
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let verb = verb.to_lowercase();
        // Argument-less verbs only count when they stand alone, so a question
        // that happens to start with one still reaches the session
        if !rest.is_empty() && !takes_argument(&verb) {
            return Command::Text(line.to_string());
        }

        match verb.as_str() {
            "list" => Command::List,
            "search" => Command::Search(rest.to_string()),
            "stats" => Command::Stats,
            "open" => match rest.parse() {
                Ok(id) => Command::Open(id),
                Err(_) => Command::Invalid(format!("usage: open <id>, got '{rest}'")),
            },
            "ask" => with_text(rest, "ask <question>", Command::Ask),
            "feedback" => Command::Feedback,
            "rate" => match rest.parse() {
                Ok(stars) => Command::Rate(stars),
                Err(_) => Command::Invalid(format!("usage: rate <1-5>, got '{rest}'")),
            },
            "comment" => with_text(rest, "comment <text>", Command::Comment),
            "submit" => Command::Submit,
            "cancel" => Command::Cancel,
            "transcript" => Command::Transcript,
            "close" => Command::Close,
            "ai" => with_text(rest, "ai <question>", Command::General),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Text(line.to_string()),
        }
    }
}

fn takes_argument(verb: &str) -> bool {
    matches!(verb, "search" | "open" | "ask" | "rate" | "comment" | "ai")
}

fn with_text(rest: &str, usage: &str, build: fn(String) -> Command) -> Command {
    if rest.is_empty() {
        Command::Invalid(format!("usage: {usage}"))
    } else {
        build(rest.to_string())
    }
}

pub const HELP: &str = "\
Commands:
  list                 show all professors
  search <query>       filter by name, department or course
  stats                directory statistics
  open <id>            open a feedback session (closes any open one)
  ask <question>       ask about the open professor (bare text works too)
  feedback             open the anonymous feedback form
  rate <1-5>           pick a star rating on the form
  comment <text>       write the form comment
  submit               submit the form anonymously
  cancel               close the form without submitting
  transcript           show the session transcript
  close                close the session
  ai <question>        ask a general question about professors
  help                 this list
  quit                 exit";
