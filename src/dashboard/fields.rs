use eframe::egui;

/// Single-line text input for a numeric query value.
///
/// ArrowUp/ArrowDown step the parsed value by `step` and select the field contents.
pub struct QueryField<'a> {
    value: &'a mut String,
    id: egui::Id,
    width: f32,
    hint: String,
    step: f64,
}

impl<'a> QueryField<'a> {
    pub fn new(value: &'a mut String, id: egui::Id) -> Self {
        Self {
            value,
            id,
            width: 80.0,
            hint: String::new(),
            step: 1.0,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Draw the field. The response reports `changed()` for typed edits and steps.
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let mut direction = 0.0;
        if ui.memory(|m| m.has_focus(self.id)) {
            ui.input_mut(|i| {
                if i.key_pressed(egui::Key::ArrowUp) {
                    direction = 1.0;
                } else if i.key_pressed(egui::Key::ArrowDown) {
                    direction = -1.0;
                }
                if direction != 0.0 {
                    // Keep TextEdit from moving the cursor on the same keys.
                    i.events.retain(|e| {
                        !matches!(
                            e,
                            egui::Event::Key {
                                key: egui::Key::ArrowUp | egui::Key::ArrowDown,
                                ..
                            }
                        )
                    });
                }
            });
        }

        let stepped = direction != 0.0 && apply_step(self.value, direction * self.step);
        let output = egui::TextEdit::singleline(self.value)
            .id(self.id)
            .desired_width(self.width)
            .hint_text(self.hint)
            .show(ui);
        let mut response = output.response;

        if (stepped || response.gained_focus()) && response.has_focus() {
            let mut state = output.state;
            state
                .cursor
                .set_char_range(Some(egui::text::CCursorRange::select_all(&output.galley)));
            state.store(ui.ctx(), response.id);
        }
        if stepped {
            response.mark_changed();
        }
        response
    }
}

/// Add `delta` to the number in `value`. Unparsable text is left untouched.
pub(crate) fn apply_step(value: &mut String, delta: f64) -> bool {
    let Ok(current) = value.trim().parse::<f64>() else {
        return false;
    };
    let next = current + delta;
    if !next.is_finite() {
        return false;
    }
    *value = format_step(next);
    true
}

fn format_step(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{value:.4}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_integers_and_decimals() {
        let mut value = "10".to_string();
        assert!(apply_step(&mut value, 1.0));
        assert_eq!(value, "11");

        let mut value = " 2.5 ".to_string();
        assert!(apply_step(&mut value, -1.0));
        assert_eq!(value, "1.5");

        let mut value = "0.1".to_string();
        assert!(apply_step(&mut value, 0.2));
        assert_eq!(value, "0.3");
    }

    #[test]
    fn unparsable_text_is_kept() {
        let mut value = "abc".to_string();
        assert!(!apply_step(&mut value, 1.0));
        assert_eq!(value, "abc");
    }
}
