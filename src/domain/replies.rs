// ============================================================
// Layer 3 — Reply Templates
// ============================================================
// Maps a predicted label to a canned reply.
//
// The lookup is total: any string, including labels the
// classifier never saw, gets either its template or the
// default reply. It never fails.

use crate::domain::traits::ReplySource;

/// Reply used for any label without a template.
pub const DEFAULT_REPLY: &str = "Thank you for your comment.";

/// (label, reply) pairs for the known categories.
pub const REPLY_TEMPLATES: &[(&str, &str)] = &[
    ("praise",                 "Thank you so much for your kind words and appreciation!"),
    ("support",                "Thanks for the encouragement. We really appreciate your support."),
    ("constructive_criticism", "Thank you for the honest feedback. We’ll review this and work on improving."),
    ("hate_abuse",             "Your feedback has been noted. Let’s try to keep the conversation respectful."),
    ("threat",                 "We take your concern seriously and will review this situation carefully."),
    ("emotional",              "Thank you for sharing how this made you feel. We’re glad it resonated with you."),
    ("spam_irrelevant",        "This comment seems unrelated to the post and may not be addressed."),
    ("question_suggestion",    "Thanks for the suggestion! We’ll consider creating content on this topic."),
];

/// Return the reply template for `label`, or [`DEFAULT_REPLY`].
pub fn generate_reply(label: &str) -> &'static str {
    REPLY_TEMPLATES
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, reply)| *reply)
        .unwrap_or(DEFAULT_REPLY)
}

/// True if `label` has its own template.
pub fn is_known_label(label: &str) -> bool {
    REPLY_TEMPLATES.iter().any(|(known, _)| *known == label)
}

/// The built-in template table as a [`ReplySource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyTemplates;

impl ReplySource for ReplyTemplates {
    fn reply_for(&self, label: &str) -> String {
        generate_reply(label).to_string()
    }
}
