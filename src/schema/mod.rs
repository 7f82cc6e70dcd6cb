//! Field schema registry.
//!
//! The registry is the single source of truth for the borrower form:
//! field order, declared value kinds, defaults, and enumerated domains.
//! It is built once at startup and threaded into every consumer; iteration
//! order is insertion order and defines the form layout, so downstream code
//! must never reorder it.

/// Declared value kind of a field.
///
/// Collection branches on this declaration, never on the run-time shape of a
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Text,
}

/// Default value seeded into a freshly generated control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Number(f64),
    Text(&'static str),
}

impl FieldDefault {
    /// Render the default the way an entry control displays it.
    pub fn render(&self) -> String {
        match self {
            FieldDefault::Number(v) => v.to_string(),
            FieldDefault::Text(s) => (*s).to_string(),
        }
    }
}

/// Schema entry describing one borrower field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Unique key, also the JSON key on the wire.
    pub name: &'static str,
    pub kind: ValueKind,
    pub default: FieldDefault,
    /// Closed, ordered set of allowed values; `None` for open fields.
    pub domain: Option<&'static [&'static str]>,
}

impl FieldDef {
    /// Whether a numeric entry control advertises 0.01 step granularity.
    ///
    /// Derived from the shape of the default, not from the field's true
    /// domain: a whole-number default gets no fractional affordance even if
    /// the field legitimately takes fractional values later.
    pub fn fractional_step(&self) -> bool {
        matches!(self.default, FieldDefault::Number(v) if v.fract() != 0.0)
    }
}

const TERMS: &[&str] = &["36 months", "60 months"];
const GRADES: &[&str] = &["A", "B", "C", "D", "E", "F", "G"];
const EMP_LENGTHS: &[&str] = &[
    "< 1 year", "1 year", "2 years", "3 years", "4 years", "5 years", "6 years", "7 years",
    "8 years", "9 years", "10+ years",
];
const HOME_OWNERSHIP: &[&str] = &["RENT", "MORTGAGE", "OWN", "OTHER"];
const VERIFICATION: &[&str] = &["Not Verified", "Source Verified", "Verified"];
const PURPOSES: &[&str] = &[
    "debt_consolidation",
    "credit_card",
    "home_improvement",
    "major_purchase",
    "small_business",
    "car",
    "medical",
    "moving",
    "vacation",
    "house",
    "wedding",
    "renewable_energy",
    "educational",
    "other",
];
const LIST_STATUS: &[&str] = &["w", "f"];
const APPLICATION_TYPES: &[&str] = &["INDIVIDUAL", "JOINT", "DIRECT_PAY"];

/// Fixed, ordered catalog of borrower field definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    fields: Vec<FieldDef>,
}

impl Registry {
    /// Build the standard borrower catalog.
    ///
    /// Order here is display order and is significant: the form, the wire
    /// payload, and the `fields` printout all follow it.
    pub fn standard() -> Self {
        use FieldDefault::{Number, Text};
        use ValueKind::{Numeric, Text as TextKind};

        let fields = vec![
            field("loan_amnt", Numeric, Number(10000.0), None),
            field("term", TextKind, Text("36 months"), Some(TERMS)),
            field("int_rate", Numeric, Number(13.56), None),
            field("installment", Numeric, Number(339.25), None),
            field("grade", TextKind, Text("B"), Some(GRADES)),
            field("sub_grade", TextKind, Text("B4"), None),
            field("emp_length", TextKind, Text("10+ years"), Some(EMP_LENGTHS)),
            field("home_ownership", TextKind, Text("MORTGAGE"), Some(HOME_OWNERSHIP)),
            field("annual_inc", Numeric, Number(65000.0), None),
            field("verification_status", TextKind, Text("Verified"), Some(VERIFICATION)),
            field("issue_d", TextKind, Text("Jan-2019"), None),
            field("purpose", TextKind, Text("debt_consolidation"), Some(PURPOSES)),
            field("dti", Numeric, Number(18.65), None),
            field("open_acc", Numeric, Number(11.0), None),
            field("pub_rec", Numeric, Number(0.0), None),
            field("revol_bal", Numeric, Number(16734.0), None),
            field("revol_util", Numeric, Number(53.8), None),
            field("total_acc", Numeric, Number(25.0), None),
            field("initial_list_status", TextKind, Text("w"), Some(LIST_STATUS)),
            field("application_type", TextKind, Text("INDIVIDUAL"), Some(APPLICATION_TYPES)),
            field("mort_acc", Numeric, Number(1.0), None),
            field("pub_rec_bankruptcies", Numeric, Number(0.0), None),
        ];

        Self { fields }
    }

    /// Read-only lookup by field name.
    pub fn definition(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields in layout order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn field(
    name: &'static str,
    kind: ValueKind,
    default: FieldDefault,
    domain: Option<&'static [&'static str]>,
) -> FieldDef {
    FieldDef {
        name,
        kind,
        default,
        domain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_order_is_stable() {
        let registry = Registry::standard();
        assert_eq!(registry.len(), 22);

        let names: Vec<&str> = registry.fields().iter().map(|f| f.name).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len(), "duplicate field name in catalog");

        // Layout anchors: first and last fields keep their positions.
        assert_eq!(names.first(), Some(&"loan_amnt"));
        assert_eq!(names.last(), Some(&"pub_rec_bankruptcies"));
    }

    #[test]
    fn definition_lookup_matches_iteration() {
        let registry = Registry::standard();
        for def in registry.fields() {
            let found = registry.definition(def.name).expect("lookup failed");
            assert_eq!(found.name, def.name);
        }
        assert!(registry.definition("no_such_field").is_none());
    }

    #[test]
    fn enumerated_defaults_belong_to_their_domain() {
        let registry = Registry::standard();
        for def in registry.fields() {
            if let Some(domain) = def.domain {
                let default = def.default.render();
                assert!(
                    domain.iter().any(|option| *option == default),
                    "default '{default}' of '{}' not in domain",
                    def.name
                );
            }
        }
    }

    #[test]
    fn declared_kinds_match_default_shapes() {
        let registry = Registry::standard();
        for def in registry.fields() {
            match def.kind {
                ValueKind::Numeric => {
                    assert!(matches!(def.default, FieldDefault::Number(_)), "{}", def.name)
                }
                ValueKind::Text => {
                    assert!(matches!(def.default, FieldDefault::Text(_)), "{}", def.name)
                }
            }
        }
    }

    #[test]
    fn fractional_step_tracks_default_shape() {
        let registry = Registry::standard();

        let int_rate = registry.definition("int_rate").unwrap();
        assert!(int_rate.fractional_step());

        let loan_amnt = registry.definition("loan_amnt").unwrap();
        assert!(!loan_amnt.fractional_step());

        // Whole-number defaults never get the affordance even though the
        // field takes fractional values.
        let open_acc = registry.definition("open_acc").unwrap();
        assert!(!open_acc.fractional_step());
    }
}
