use bevy_ecs::prelude::*;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_input::InputRequest;

use crate::data::{LoginError, User};
use crate::ui::{rect::take_top, styles};
use crate::widgets::TextField;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Token,
}

#[derive(Debug, Resource)]
pub struct LoginForm {
    email: TextField,
    token: TextField,
    field: LoginField,
    error: Option<LoginError>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: TextField::default(),
            token: TextField::masked(),
            field: LoginField::Email,
            error: None,
        }
    }
}

fn error_text(err: LoginError) -> String {
    match err {
        LoginError::MissingEmail => t!("Login.MissingEmail"),
        LoginError::InvalidEmail => t!("Login.InvalidEmail"),
    }
}

impl LoginForm {
    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn error(&self) -> Option<LoginError> {
        self.error
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            LoginField::Email => LoginField::Token,
            LoginField::Token => LoginField::Email,
        };
    }

    pub fn input(&mut self, request: InputRequest) {
        let field = match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Token => &mut self.token,
        };
        if field.handle(request) {
            self.error = None;
        }
    }

    /// Validate the form; a failure stays on the form until the next edit
    pub fn submit(&mut self) -> Option<User> {
        match User::login(self.email.value(), self.token.value()) {
            Ok(user) => {
                tracing::info!(user = user.display_name(), "signed in");
                *self = Self::default();
                Some(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "login rejected");
                self.error = Some(err);
                self.field = LoginField::Email;
                None
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect) {
        let rect = crate::ui::rect::centered(52, 13, rect);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles::border())
            .title(Span::styled(t!("Login.Title"), styles::brand()));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let (hint, rest) = take_top(2, inner);
        frame.render_widget(
            Paragraph::new(Span::styled(t!("Login.Hint"), styles::gray()))
                .alignment(Alignment::Center),
            hint,
        );
        let (email, rest) = take_top(3, rest);
        self.email.render(
            frame,
            email,
            t!("Login.Email"),
            self.field == LoginField::Email,
        );
        let (token, rest) = take_top(3, rest);
        self.token.render(
            frame,
            token,
            t!("Login.Token"),
            self.field == LoginField::Token,
        );

        let message = self.error.map_or_else(
            || Line::from(Span::styled(t!("Login.Submit"), styles::dark_gray())),
            |err| Line::from(Span::styled(error_text(err), styles::error())),
        );
        let (status, _) = take_top(1, rest);
        frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), status);
    }
}

#[cfg(test)]
mod tests {
    use tui_input::InputRequest;

    use super::{LoginField, LoginForm};
    use crate::data::LoginError;

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.input(InputRequest::InsertChar(c));
        }
    }

    #[test]
    fn submits_valid_credentials() {
        let mut form = LoginForm::default();
        type_text(&mut form, "ada@example.com");
        form.switch_field();
        assert_eq!(form.field(), LoginField::Token);
        type_text(&mut form, "secret");

        let user = form.submit().expect("valid login");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.token.as_deref(), Some("secret"));
        assert_eq!(form.field(), LoginField::Email);
    }

    #[test]
    fn rejection_is_cleared_by_editing() {
        let mut form = LoginForm::default();
        type_text(&mut form, "ada");
        assert!(form.submit().is_none());
        assert_eq!(form.error(), Some(LoginError::InvalidEmail));

        type_text(&mut form, "@example.com");
        assert_eq!(form.error(), None);
        assert!(form.submit().is_some());
    }

    #[test]
    fn empty_email_is_rejected() {
        let mut form = LoginForm::default();
        form.switch_field();
        type_text(&mut form, "token");
        assert!(form.submit().is_none());
        assert_eq!(form.error(), Some(LoginError::MissingEmail));
        assert_eq!(form.field(), LoginField::Email);
    }
}
