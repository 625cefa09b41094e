pub mod database;
pub mod mailer;

pub use database::SiteDatabase;
pub use mailer::{
    build_message, compose_newsletter, compose_reply, parse_mailbox, LogMailer, ReplyDraft, ReplySignature,
};
