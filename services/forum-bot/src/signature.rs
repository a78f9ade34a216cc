//! Attribution footer for bot-authored discussions
//!
//! Only new discussions are signed. Replies go out exactly as written.

/// Separator placed between the caller's body and the footer
pub const FOOTER_DELIMITER: &str = "\n\n---\n\n";

/// Who the footer attributes the post to
#[derive(Debug, Clone)]
pub struct Attribution {
    pub bot_name: String,
    pub app_id: Option<String>,
}

impl Attribution {
    pub fn new(bot_name: impl Into<String>, app_id: Option<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            app_id,
        }
    }

    pub fn footer(&self) -> String {
        let mut footer = format!(
            "🤖 **{}**\n- Identity: official GitHub App bot\n- Type: AI-generated content\n",
            self.bot_name
        );
        if let Some(app_id) = &self.app_id {
            footer.push_str(&format!("- App ID: {}\n", app_id));
        }
        footer.push_str(&format!("\n*Posted by the {}*", self.bot_name));
        footer
    }

    /// `raw` followed by the delimiter and the footer
    pub fn sign(&self, raw: &str) -> String {
        format!("{}{}{}", raw, FOOTER_DELIMITER, self.footer())
    }
}
