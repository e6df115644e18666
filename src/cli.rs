//! CLI front end. Drives a wizard session from stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::FieldError;
use crate::wizard::{InvitationMode, ProfileField, RegistrationWizard, StepView};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Set { field: ProfileField, value: String },
    Select { field: ProfileField, value: String },
    Show,
    Mode(InvitationMode),
    Target(String),
    Invite,
    Copy,
    Submit,
    Help,
    Quit,
    /// Input that could not be understood, with the reason.
    Invalid(String),
}

impl Command {
    /// Parse one line of input.
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };

        match head.to_lowercase().as_str() {
            "next" | "n" => Command::Next,
            "prev" | "back" | "p" => Command::Previous,
            "show" | "" => Command::Show,
            "invite" => Command::Invite,
            "copy" => Command::Copy,
            "submit" | "done" => Command::Submit,
            "help" | "/help" | "/?" => Command::Help,
            "/quit" | "/exit" | "quit" => Command::Quit,
            "set" => parse_field_value(rest, false),
            "select" => parse_field_value(rest, true),
            "mode" => match rest.parse::<InvitationMode>() {
                Ok(mode) => Command::Mode(mode),
                Err(e) => Command::Invalid(e.to_string()),
            },
            "target" => Command::Target(rest.to_string()),
            other => Command::Invalid(format!("Unknown command: {other}")),
        }
    }
}

/// `set <field> <value...>` / `select <field> <value>`.
fn parse_field_value(rest: &str, select: bool) -> Command {
    let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if name.is_empty() {
        return Command::Invalid("Usage: set <field> <value>".into());
    }
    let field = match name.parse::<ProfileField>() {
        Ok(field) => field,
        Err(FieldError::UnknownField(name)) => {
            let known: Vec<_> = ProfileField::ALL.iter().map(|f| f.wire_name()).collect();
            return Command::Invalid(format!(
                "Unknown field {name:?}. Fields: {}",
                known.join(", ")
            ));
        }
        Err(e) => return Command::Invalid(e.to_string()),
    };
    let value = value.trim().to_string();
    if select {
        Command::Select { field, value }
    } else {
        Command::Set { field, value }
    }
}

pub const HELP: &str = "\
Commands:
  next | prev              move between steps
  set <field> <value>      fill a text field
  select <field> <value>   pick a choice (specialite)
  show                     print the current step
  mode link|email          choose how to invite clients (last step)
  target <email>           client address for email invitations
  invite                   send the email invitation
  copy                     copy the invitation link
  submit                   finish registration (last step)
  /quit                    leave without submitting";

/// Render a step view as plain text.
pub fn render(view: &StepView) -> String {
    let mut out = vec![format!("── {} · {} ──", view.progress, view.title)];

    for field in &view.fields {
        let marker = if field.required { "*" } else { " " };
        let value = if field.value.is_empty() {
            "—".to_string()
        } else {
            field.value.clone()
        };
        out.push(format!("{marker} {:<20} {}  [{}]", field.field.wire_name(), value, field.label));
        if !field.options.is_empty() {
            let options: Vec<_> = field.options.iter().map(|o| o.value).collect();
            out.push(format!("    options: {}", options.join(", ")));
        }
    }

    if let Some(ref invitation) = view.invitation {
        out.push(format!("  mode: {}  ({})", invitation.mode, invitation.mode.label()));
        if let Some(ref link) = invitation.link {
            out.push(format!("  link: {link}"));
        }
        if let Some(ref target) = invitation.pending_email_target {
            out.push(format!("  target: {target}"));
        }
    }

    if !view.missing_required.is_empty() {
        let missing: Vec<_> = view.missing_required.iter().map(|f| f.wire_name()).collect();
        out.push(format!("  still empty: {}", missing.join(", ")));
    }

    out.join("\n")
}

/// Outcome of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading input; print the message.
    Continue(String),
    /// Registration finished.
    Completed,
    /// The user left.
    Quit,
}

/// Apply one command to the wizard.
pub async fn execute(wizard: &RegistrationWizard, command: Command) -> Outcome {
    let message = match command {
        Command::Next => {
            wizard.advance().await;
            render(&wizard.view().await)
        }
        Command::Previous => {
            wizard.retreat().await;
            render(&wizard.view().await)
        }
        Command::Set { field, value } => {
            wizard.set_field(field, value).await;
            format!("{field} updated")
        }
        Command::Select { field, value } => {
            wizard.set_select_field(field, value).await;
            format!("{field} updated")
        }
        Command::Show => render(&wizard.view().await),
        Command::Mode(mode) => {
            wizard.set_invitation_mode(mode).await;
            format!("Invitation mode: {}", mode.label())
        }
        Command::Target(email) => {
            wizard.set_pending_email_target(email).await;
            "Client address updated".to_string()
        }
        Command::Invite => match wizard.send_invite().await {
            Ok(()) => "Invitation sent".to_string(),
            Err(e) => format!("Invitation failed: {e}"),
        },
        Command::Copy => match wizard.copy_link().await {
            Ok(()) => "Link copied".to_string(),
            Err(e) => format!("Cannot copy link: {e}"),
        },
        Command::Submit => match wizard.submit().await {
            Ok(()) => return Outcome::Completed,
            Err(e) => format!("Registration failed: {e}"),
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return Outcome::Quit,
        Command::Invalid(reason) => reason,
    };
    Outcome::Continue(message)
}

/// Read commands line by line until the wizard completes, the user quits, or
/// input ends. Returns whether registration completed.
pub async fn run<R>(wizard: Arc<RegistrationWizard>, input: R) -> bool
where
    R: AsyncBufRead + Unpin,
{
    println!("{}\n", render(&wizard.view().await));
    eprint!("> ");

    let mut lines = input.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match execute(&wizard, Command::parse(&line)).await {
                Outcome::Continue(message) => {
                    println!("{message}\n");
                    eprint!("> ");
                }
                Outcome::Completed => {
                    println!("Registration complete.");
                    return true;
                }
                Outcome::Quit => return false,
            },
            Ok(None) => return false, // EOF
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                return false;
            }
        }
    }
}
