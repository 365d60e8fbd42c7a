//! Confirmation / detail dialog state machine.

/// Input field focused inside a dialog with two text boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogField {
    #[default]
    Primary,
    Secondary,
}

impl DialogField {
    fn next(self) -> Self {
        match self {
            DialogField::Primary => DialogField::Secondary,
            DialogField::Secondary => DialogField::Primary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Dialog {
    #[default]
    Closed,
    Viewing {
        id: String,
    },
    ConfirmingApprove {
        targets: Vec<String>,
    },
    /// Primary field is the reason, secondary the detailed reason.
    ConfirmingReject {
        targets: Vec<String>,
        reason: String,
        detail: String,
        field: DialogField,
    },
    ConfirmingDelete {
        id: String,
    },
    /// Primary field is the marks, secondary the feedback.
    Grading {
        id: String,
        marks: String,
        feedback: String,
        field: DialogField,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DialogController {
    state: Dialog,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Dialog {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != Dialog::Closed
    }

    pub fn view(&mut self, id: impl Into<String>) {
        self.state = Dialog::Viewing { id: id.into() };
    }

    pub fn confirm_approve(&mut self, targets: Vec<String>) {
        self.state = Dialog::ConfirmingApprove { targets };
    }

    /// Open the reject dialog with empty inputs; nothing carries over from a
    /// previous subject.
    pub fn confirm_reject(&mut self, targets: Vec<String>) {
        self.state = Dialog::ConfirmingReject {
            targets,
            reason: String::new(),
            detail: String::new(),
            field: DialogField::Primary,
        };
    }

    pub fn confirm_delete(&mut self, id: impl Into<String>) {
        self.state = Dialog::ConfirmingDelete { id: id.into() };
    }

    pub fn grade(&mut self, id: impl Into<String>) {
        self.state = Dialog::Grading {
            id: id.into(),
            marks: String::new(),
            feedback: String::new(),
            field: DialogField::Primary,
        };
    }

    pub fn cancel(&mut self) {
        self.state = Dialog::Closed;
    }

    /// Called after the gated action succeeded.
    pub fn complete(&mut self) {
        self.state = Dialog::Closed;
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        match &mut self.state {
            Dialog::ConfirmingReject {
                reason,
                detail,
                field,
                ..
            } => Some(match field {
                DialogField::Primary => reason,
                DialogField::Secondary => detail,
            }),
            Dialog::Grading {
                marks,
                feedback,
                field,
                ..
            } => Some(match field {
                DialogField::Primary => marks,
                DialogField::Secondary => feedback,
            }),
            _ => None,
        }
    }

    pub fn input(&mut self, c: char) {
        if let Some(buf) = self.focused_mut() {
            buf.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buf) = self.focused_mut() {
            buf.pop();
        }
    }

    pub fn next_field(&mut self) {
        match &mut self.state {
            Dialog::ConfirmingReject { field, .. } | Dialog::Grading { field, .. } => {
                *field = field.next();
            }
            _ => {}
        }
    }
}
