mod mailer;

pub use mailer::SesMailer;
