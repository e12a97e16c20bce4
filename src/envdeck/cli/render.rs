use chrono::{DateTime, Utc};
use colored::Colorize;
use envdeck::api::{CmdMessage, MessageLevel};
use envdeck::config::EnvDeckConfig;
use envdeck::model::{Document, Environment};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 20;
const DESCRIPTION_WIDTH: usize = 40;
const ACTIVE_MARKER: &str = "●";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_environments(environments: &[Environment]) {
    if environments.is_empty() {
        println!("No environments found.");
        return;
    }

    for env in environments {
        let marker = if env.active {
            format!(" {} ", ACTIVE_MARKER).green().to_string()
        } else {
            "   ".to_string()
        };

        let name = pad_to_width(&truncate_to_width(&env.name, NAME_WIDTH), NAME_WIDTH);
        let name = if env.active {
            name.bold().to_string()
        } else {
            name
        };

        let description = env
            .description
            .as_deref()
            .map(|d| truncate_to_width(&d.replace('\n', " "), DESCRIPTION_WIDTH))
            .unwrap_or_default();

        println!(
            "{}{} {}  {}",
            marker,
            name,
            env.url.cyan(),
            description.dimmed()
        );
    }
}

pub(super) fn print_document_list(documents: &[Document]) {
    if documents.is_empty() {
        println!("No documentation found.");
        return;
    }

    for doc in documents {
        let name = pad_to_width(&truncate_to_width(&doc.name, NAME_WIDTH), NAME_WIDTH);
        let first_line = doc
            .content
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("(empty)");
        println!(
            "   {} {}  {}",
            name,
            truncate_to_width(first_line, DESCRIPTION_WIDTH),
            format!("updated {}", format_time_ago(doc.updated_at)).dimmed()
        );
    }
}

pub(super) fn print_document(doc: &Document) {
    println!("{}", doc.name.bold());
    println!(
        "{}",
        format!(
            "created {}, updated {}",
            format_time_ago(doc.created_at),
            format_time_ago(doc.updated_at)
        )
        .dimmed()
    );
    println!("--------------------------------");
    println!("{}", doc.content);
}

pub(super) fn print_config(config: &EnvDeckConfig) {
    for key in EnvDeckConfig::keys() {
        let value = config.get(key).unwrap_or_default();
        println!("{} = {}", key, value);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters count double.
        assert_eq!(truncate_to_width("日本語のテキスト", 6), "日本…");
    }

    #[test]
    fn pads_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }
}
