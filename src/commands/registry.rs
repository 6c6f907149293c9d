/// What a command does; `super::dispatch` maps each kind to its handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Connect,
    SystemPrompt,
    Temperature,
    Reset,
    Backend,
}

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub alias: &'static str,
    pub usages: &'static [CommandUsage],
    pub kind: CommandKind,
}

#[derive(Clone, Copy, Debug)]
pub struct CommandInvocation<'a> {
    /// The whole trimmed input, echoed back in the transcript.
    pub input: &'a str,
    /// Everything after the command token, trimmed.
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    /// Remaining tokens joined by single spaces.
    pub fn joined_args(&self) -> String {
        self.args.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands().iter().find(|command| {
        command.name.eq_ignore_ascii_case(name) || command.alias.eq_ignore_ascii_case(name)
    })
}

const COMMANDS: &[Command] = &[
    Command {
        name: "h",
        alias: "help",
        usages: &[CommandUsage {
            syntax: "/h",
            description: "Print this help message",
        }],
        kind: CommandKind::Help,
    },
    Command {
        name: "c",
        alias: "connect",
        usages: &[
            CommandUsage {
                syntax: "/c <host>",
                description: "Connect to a server host (bare host, host:port or full URL)",
            },
            CommandUsage {
                syntax: "/c",
                description: "Print the connected server host and model",
            },
        ],
        kind: CommandKind::Connect,
    },
    Command {
        name: "s",
        alias: "system",
        usages: &[
            CommandUsage {
                syntax: "/s <prompt>",
                description: "Set the system prompt",
            },
            CommandUsage {
                syntax: "/s",
                description: "Print the system prompt",
            },
        ],
        kind: CommandKind::SystemPrompt,
    },
    Command {
        name: "t",
        alias: "temperature",
        usages: &[
            CommandUsage {
                syntax: "/t <temperature>",
                description: "Set the sampling temperature from 0 (focused) to 1 (creative)",
            },
            CommandUsage {
                syntax: "/t",
                description: "Print the sampling temperature",
            },
        ],
        kind: CommandKind::Temperature,
    },
    Command {
        name: "r",
        alias: "reset",
        usages: &[CommandUsage {
            syntax: "/r",
            description: "Reset the chat",
        }],
        kind: CommandKind::Reset,
    },
    Command {
        name: "b",
        alias: "backend",
        usages: &[CommandUsage {
            syntax: "/b",
            description: "Switch between the OpenAI-compatible and Ollama backends",
        }],
        kind: CommandKind::Backend,
    },
];
