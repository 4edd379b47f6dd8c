/// Modal error message with a dismissal hint

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBox {
    pub title: String,
    pub message: String,
    pub detail: String,
    pub hint: String,
}

impl ErrorBox {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: " Error ".into(),
            message: message.into(),
            detail: detail.into(),
            hint: "Press <Esc> to dismiss".into(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.message.clone()];
        if !self.detail.is_empty() {
            lines.push(String::new());
            lines.push(self.detail.clone());
        }
        lines.push(String::new());
        lines.push(self.hint.clone());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let b = ErrorBox::new("Could not send signal", "operation not permitted");
        assert_eq!(b.lines(), vec![
            "Could not send signal".to_string(),
            String::new(),
            "operation not permitted".to_string(),
            String::new(),
            "Press <Esc> to dismiss".to_string(),
        ]);
        assert_eq!(ErrorBox::new("x", "").lines().len(), 3);
    }
}
