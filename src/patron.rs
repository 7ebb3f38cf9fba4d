use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a patron, assigned by the caller at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct PatronId(String);

impl PatronId {
    /// Wrap a caller-assigned identifier.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatronId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The patron categories the directory distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum PatronType {
    /// An enrolled student.
    Student,
    /// A faculty member.
    Faculty,
}

impl fmt::Display for PatronType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => f.write_str("Student"),
            Self::Faculty => f.write_str("Faculty"),
        }
    }
}

/// Variant-specific descriptive fields, opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum PatronKind {
    /// Descriptive fields of a student.
    Student {
        /// Institutional student number.
        student_number: String,
        /// Declared field of study.
        major: String,
    },
    /// Descriptive fields of a faculty member.
    Faculty {
        /// Home department.
        department: String,
        /// Institutional employee id.
        employee_id: String,
    },
}

/// A person authorized to borrow items, carrying an activity flag and the
/// borrowing policy fixed by their variant.
///
/// `loan_extension_days` is declared policy data: no engine operation
/// consumes it, since there is no renewal workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Patron {
    /// Caller-assigned identifier, unique within the directory.
    id: PatronId,
    /// Display name.
    name: String,
    /// Contact information; updatable after registration.
    contact: String,
    /// Whether the patron may start new checkouts.
    active: bool,
    /// Maximum number of concurrently held items.
    max_borrow_items: usize,
    /// Extension period the variant would be entitled to, in days.
    loan_extension_days: i64,
    /// Variant-specific descriptive fields.
    kind: PatronKind,
}

impl Patron {
    /// Create a student patron. Students hold at most 5 items and would be
    /// entitled to 7-day extensions.
    #[must_use]
    pub fn student(id: &str, name: &str, contact: &str, student_number: &str, major: &str) -> Self {
        Self {
            id: PatronId::new(id),
            name: name.to_string(),
            contact: contact.to_string(),
            active: true,
            max_borrow_items: 5,
            loan_extension_days: 7,
            kind: PatronKind::Student {
                student_number: student_number.to_string(),
                major: major.to_string(),
            },
        }
    }

    /// Create a faculty patron. Faculty hold at most 10 items and would be
    /// entitled to 14-day extensions.
    #[must_use]
    pub fn faculty(id: &str, name: &str, contact: &str, department: &str, employee_id: &str) -> Self {
        Self {
            id: PatronId::new(id),
            name: name.to_string(),
            contact: contact.to_string(),
            active: true,
            max_borrow_items: 10,
            loan_extension_days: 14,
            kind: PatronKind::Faculty {
                department: department.to_string(),
                employee_id: employee_id.to_string(),
            },
        }
    }

    /// The patron's identifier.
    #[must_use]
    pub fn id(&self) -> &PatronId {
        &self.id
    }

    /// The patron's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The patron's contact information.
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Whether the patron may start new checkouts. Activity has no effect on
    /// checkouts that are already open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Maximum number of items this patron may hold at once.
    #[must_use]
    pub fn max_borrow_items(&self) -> usize {
        self.max_borrow_items
    }

    /// Extension period this patron's variant would be entitled to, in days.
    #[must_use]
    pub fn loan_extension_days(&self) -> i64 {
        self.loan_extension_days
    }

    /// The variant-specific descriptive fields.
    #[must_use]
    pub fn kind(&self) -> &PatronKind {
        &self.kind
    }

    /// The bare variant tag.
    #[must_use]
    pub fn patron_type(&self) -> PatronType {
        match self.kind {
            PatronKind::Student { .. } => PatronType::Student,
            PatronKind::Faculty { .. } => PatronType::Faculty,
        }
    }

    /// Flip the activity flag. Only the ledger's activate and deactivate
    /// operations call this.
    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Replace the contact information. Only the ledger's contact update
    /// operation calls this.
    pub(crate) fn set_contact(&mut self, contact: &str) {
        self.contact = contact.to_string();
    }
}

impl fmt::Display for Patron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_policies() {
        let student = Patron::student("S1", "Jane Doe", "jane@uni.edu", "STU123457", "English");
        assert_eq!(student.max_borrow_items(), 5);
        assert_eq!(student.loan_extension_days(), 7);
        assert_eq!(student.patron_type(), PatronType::Student);

        let faculty = Patron::faculty("F1", "Dr. Smith", "smith@uni.edu", "CS", "FAC001");
        assert_eq!(faculty.max_borrow_items(), 10);
        assert_eq!(faculty.loan_extension_days(), 14);
        assert_eq!(faculty.patron_type(), PatronType::Faculty);
    }

    #[test]
    fn test_new_patron_is_active() {
        let student = Patron::student("S1", "Jane Doe", "jane@uni.edu", "STU123457", "English");
        assert!(student.is_active());
    }
}
