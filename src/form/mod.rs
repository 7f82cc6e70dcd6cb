//! Borrower sub-form generation.
//!
//! A "form" here is a pure model: an ordered list of controls carrying their
//! current textual value plus a validity marker. Both front-ends render it
//! (the TUI as widgets, the CLI by filling it programmatically), so the
//! generation/collection pipeline needs no UI harness to be exercised.

use crate::schema::{Registry, ValueKind};

pub mod collect;

/// Key used for the identifier control; also its JSON key on the wire.
pub const LOAN_ID_FIELD: &str = "loan_id";

/// Widget classification decided from the field definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Single selection over a closed, ordered domain.
    Select {
        options: Vec<String>,
        selected: usize,
    },
    /// Free text entry.
    Text,
    /// Numeric entry; `fractional_step` advertises 0.01 granularity.
    Numeric { fractional_step: bool },
}

/// A single interactive control inside a borrower sub-form.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub name: String,
    pub widget: Widget,
    /// Current textual value as the user sees it.
    pub value: String,
    /// Set by validation when the value fails collection.
    pub invalid: bool,
}

impl Control {
    /// Replace the value and clear any stale validity marker.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.invalid = false;
        if let Widget::Select { options, selected } = &mut self.widget {
            if let Some(pos) = options.iter().position(|o| *o == self.value) {
                *selected = pos;
            }
        }
    }

    /// Move a selection control through its domain; no-op for entry controls.
    pub fn cycle_option(&mut self, delta: isize) {
        if let Widget::Select { options, selected } = &mut self.widget {
            if options.is_empty() {
                return;
            }
            let len = options.len() as isize;
            let next = (*selected as isize + delta).rem_euclid(len) as usize;
            *selected = next;
            self.value = options[next].clone();
            self.invalid = false;
        }
    }

    /// Adjustment granularity for numeric entry controls.
    pub fn step(&self) -> Option<f64> {
        match self.widget {
            Widget::Numeric { fractional_step } => {
                Some(if fractional_step { 0.01 } else { 1.0 })
            }
            _ => None,
        }
    }
}

/// One borrower's sub-form; `index` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerForm {
    pub index: usize,
    pub controls: Vec<Control>,
}

impl BorrowerForm {
    pub fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.name == name)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }
}

/// Build exactly `count` independent sub-forms in registry layout order.
///
/// Each sub-form renders a free-text `loan_id` control first, then one
/// control per field definition. Previously generated forms are simply
/// dropped by the caller; no record survives a regeneration.
pub fn generate_forms(registry: &Registry, count: usize) -> Vec<BorrowerForm> {
    (1..=count)
        .map(|index| BorrowerForm {
            index,
            controls: build_controls(registry),
        })
        .collect()
}

fn build_controls(registry: &Registry) -> Vec<Control> {
    let mut controls = Vec::with_capacity(registry.len() + 1);
    controls.push(Control {
        name: LOAN_ID_FIELD.to_string(),
        widget: Widget::Text,
        value: String::new(),
        invalid: false,
    });

    for def in registry.fields() {
        let control = match def.domain {
            Some(domain) => {
                let options: Vec<String> = domain.iter().map(|s| s.to_string()).collect();
                let default = def.default.render();
                let selected = options.iter().position(|o| *o == default).unwrap_or(0);
                Control {
                    name: def.name.to_string(),
                    widget: Widget::Select { options, selected },
                    value: default,
                    invalid: false,
                }
            }
            None => Control {
                name: def.name.to_string(),
                widget: match def.kind {
                    ValueKind::Numeric => Widget::Numeric {
                        fractional_step: def.fractional_step(),
                    },
                    ValueKind::Text => Widget::Text,
                },
                value: def.default.render(),
                invalid: false,
            },
        };
        controls.push(control);
    }

    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exactly_n_forms_with_full_layout() {
        let registry = Registry::standard();
        for n in [1usize, 2, 5] {
            let forms = generate_forms(&registry, n);
            assert_eq!(forms.len(), n);
            for (i, form) in forms.iter().enumerate() {
                assert_eq!(form.index, i + 1);
                assert_eq!(form.controls.len(), registry.len() + 1);
                assert_eq!(form.controls[0].name, LOAN_ID_FIELD);
                for (control, def) in form.controls[1..].iter().zip(registry.fields()) {
                    assert_eq!(control.name, def.name, "layout order must follow the registry");
                }
            }
        }
    }

    #[test]
    fn select_controls_offer_the_exact_domain_with_default_preselected() {
        let registry = Registry::standard();
        let forms = generate_forms(&registry, 1);

        for def in registry.fields() {
            let Some(domain) = def.domain else { continue };
            let control = forms[0].control(def.name).unwrap();
            let Widget::Select { options, selected } = &control.widget else {
                panic!("'{}' should be a selection control", def.name);
            };
            let expected: Vec<String> = domain.iter().map(|s| s.to_string()).collect();
            assert_eq!(*options, expected, "domain mismatch for '{}'", def.name);
            assert_eq!(options[*selected], def.default.render());
            assert_eq!(control.value, def.default.render());
        }
    }

    #[test]
    fn numeric_controls_follow_declared_kind_and_step_rule() {
        let registry = Registry::standard();
        let forms = generate_forms(&registry, 1);

        let int_rate = forms[0].control("int_rate").unwrap();
        assert_eq!(int_rate.widget, Widget::Numeric { fractional_step: true });
        assert_eq!(int_rate.step(), Some(0.01));

        let loan_amnt = forms[0].control("loan_amnt").unwrap();
        assert_eq!(loan_amnt.widget, Widget::Numeric { fractional_step: false });
        assert_eq!(loan_amnt.step(), Some(1.0));

        let issue_d = forms[0].control("issue_d").unwrap();
        assert_eq!(issue_d.widget, Widget::Text);
        assert_eq!(issue_d.step(), None);
    }

    #[test]
    fn cycle_option_wraps_both_directions() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 1);
        let control = forms[0].control_mut("term").unwrap();
        assert_eq!(control.value, "36 months");

        control.cycle_option(1);
        assert_eq!(control.value, "60 months");
        control.cycle_option(1);
        assert_eq!(control.value, "36 months");
        control.cycle_option(-1);
        assert_eq!(control.value, "60 months");
    }

    #[test]
    fn set_value_clears_invalid_and_syncs_selection() {
        let registry = Registry::standard();
        let mut forms = generate_forms(&registry, 1);

        let control = forms[0].control_mut("grade").unwrap();
        control.invalid = true;
        control.set_value("D");
        assert!(!control.invalid);
        let Widget::Select { options, selected } = &control.widget else {
            panic!("grade should be a selection control");
        };
        assert_eq!(options[*selected], "D");
    }
}
