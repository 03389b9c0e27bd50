//! Message formatting utilities for client display.

use codesync_server::infrastructure::dto::websocket::ClientInfo;
use codesync_shared::time::timestamp_to_jst_time_of_day;

use crate::document::SharedDocument;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the room roster, marking this participant as "me"
    pub fn format_roster(room_id: &str, clients: &[ClientInfo], my_connection_id: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str(&format!("Room '{}' participants:\n", room_id));

        if clients.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for client in clients {
                let me_suffix = if client.connection_id == my_connection_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{}{}\n", client.username, me_suffix));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn format_participant_joined(username: &str, at: i64) -> String {
        format!(
            "\n+ {} joined at {}\n",
            username,
            timestamp_to_jst_time_of_day(at)
        )
    }

    pub fn format_participant_left(username: &str, at: i64) -> String {
        format!(
            "\n- {} left at {}\n",
            username,
            timestamp_to_jst_time_of_day(at)
        )
    }

    /// Format a document update made by another participant
    pub fn format_code_change(author: &str, revision: u64, line_count: usize, at: i64) -> String {
        format!(
            "\n~ @{} updated the document (r{}, {} lines) at {}\n",
            author,
            revision,
            line_count,
            timestamp_to_jst_time_of_day(at)
        )
    }

    pub fn format_synced(revision: u64, line_count: usize) -> String {
        format!("\n~ document synced (r{}, {} lines)\n", revision, line_count)
    }

    pub fn format_published(byte_count: usize) -> String {
        format!(
            "\n~ published local document ({} bytes) to the empty room\n",
            byte_count
        )
    }

    /// Format the whole document with line numbers
    pub fn format_document(document: &SharedDocument) -> String {
        let revision = document
            .revision()
            .map(|r| format!("r{}", r))
            .unwrap_or_else(|| "unsynced".to_string());

        let mut output = format!("\n{}\n", THIN_RULE);
        output.push_str(&format!("document ({})\n", revision));
        output.push_str(&format!("{}\n", THIN_RULE));
        if document.is_empty() {
            output.push_str("(empty)\n");
        } else {
            let width = document.line_count().to_string().len();
            for (number, line) in document.content().lines().enumerate() {
                output.push_str(&format!("{:>width$} | {}\n", number + 1, line));
            }
        }
        output.push_str(&format!("{}\n", THIN_RULE));
        output
    }

    /// Format the outcome of a code run
    pub fn format_run_result(
        status: Option<&str>,
        stdout: Option<&str>,
        stderr: Option<&str>,
        compile_output: Option<&str>,
        error: Option<&str>,
    ) -> String {
        let mut output = format!("\n{}\n", THIN_RULE);
        if let Some(error) = error {
            output.push_str(&format!("run failed: {}\n", error));
        } else {
            output.push_str(&format!("run finished: {}\n", status.unwrap_or("unknown")));
        }
        for (label, section) in [
            ("compile output", compile_output),
            ("stdout", stdout),
            ("stderr", stderr),
        ] {
            if let Some(text) = section.filter(|text| !text.is_empty()) {
                output.push_str(&format!("[{}]\n{}", label, text));
                if !text.ends_with('\n') {
                    output.push('\n');
                }
            }
        }
        output.push_str(&format!("{}\n", THIN_RULE));
        output
    }

    pub fn format_error(reason: &str) -> String {
        format!("\n! server: {}\n", reason)
    }

    pub fn format_notice(text: &str) -> String {
        format!("\n{}\n", text)
    }

    pub fn format_help() -> String {
        [
            "",
            "Type a line to append it to the shared document.",
            "  :show           print the document",
            "  :clear          empty the document for everyone",
            "  :run <id>       run the document (language id of the execution service)",
            "  :leave          leave the room and exit",
            "  :help           show this help",
            "",
        ]
        .join("\n")
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
