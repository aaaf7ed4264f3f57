//! Built-in job handler implementations.

pub mod email;

pub use email::{LogMailTransport, MailTransport, RenderedMail, SendEmailJobHandler};
