//! Metadata information regarding the database and tracked information.

pub mod database;
mod nom;

use std::sync::OnceLock;

// re-export without modules
pub use database::*;

/// Everything the generator is told about the database.
///
/// This is built once and never mutated; requests share it by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaContext {
    /// Opening lines of the schema description.
    pub preamble: &'static str,
    pub tables: Vec<TableInfo>,
    /// Domain facts the generator needs to write correct SQL (units, token standards, ...).
    pub notes: Vec<&'static str>,
    pub guidelines: Vec<&'static str>,
    pub tokens: Vec<TokenInfo>,
    /// Worked examples. Only a prefix of these is used in prompts.
    pub examples: Vec<ExampleQuery>,
    /// Natural-language questions offered to users as inspiration.
    pub sample_questions: Vec<&'static str>,
}

impl SchemaContext {
    /// The Network of Momentum indexer schema.
    pub fn nom() -> &'static SchemaContext {
        static CONTEXT: OnceLock<SchemaContext> = OnceLock::new();
        CONTEXT.get_or_init(nom::schema_context)
    }

    /// Render the schema as the text block embedded in generation prompts.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(self.preamble.trim());
        out.push_str("\n\nDATABASE SCHEMA:\n");

        for (index, table) in self.tables.iter().enumerate() {
            let indent = " ".repeat(format!("{}. ", index + 1).len());
            out.push_str(&format!(
                "\n{}. {} - {}\n",
                index + 1,
                table.name,
                table.description
            ));
            for column in &table.columns {
                let key = if column.primary_key {
                    " PRIMARY KEY"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "{indent}- {} ({}{key}): {}\n",
                    column.name, column.r#type, column.description
                ));
            }
            for constraint in &table.unique_constraints {
                out.push_str(&format!("{indent}- UNIQUE({})\n", constraint.join(", ")));
            }
        }

        out.push_str("\nIMPORTANT NOTES:\n");
        for note in &self.notes {
            out.push_str(&format!("- {note}\n"));
        }

        out.push_str("\nQUERY GUIDELINES:\n");
        for guideline in &self.guidelines {
            out.push_str(&format!("- {guideline}\n"));
        }

        out
    }
}
