//! Statements shared by every schema-scoped object kind.
//!
//! Each statement has a pure renderer (`*_statement`) and an executing
//! counterpart on [`DdlBuilder`]. Kind-specific `CREATE` rendering lives
//! with each kind behind [`CreateStatement`].

use crate::catalog;
use crate::error::Result;
use crate::executor::Executor;
use crate::object::MaterializeObject;
use crate::quote::{nullable_string, quote_identifier};

/// Render the `CREATE` statement for an object kind.
pub trait CreateStatement {
    fn create_statement(&self, object: &MaterializeObject) -> String;
}

/// `ALTER <KIND> <qn> RENAME TO <new qn>;`
pub fn rename_statement(object: &MaterializeObject, new_name: &str) -> String {
    format!(
        "ALTER {} {} RENAME TO {};",
        object.object_type,
        object.qualified_name(),
        object.renamed(new_name).qualified_name()
    )
}

/// `ALTER <KIND> <qn> OWNER TO "<role>";`
pub fn owner_statement(object: &MaterializeObject, role: &str) -> String {
    format!(
        "ALTER {} {} OWNER TO {};",
        object.object_type,
        object.qualified_name(),
        quote_identifier(role)
    )
}

/// `COMMENT ON <KIND> <qn> IS '<text>';`, or `IS NULL` to clear it.
pub fn comment_statement(object: &MaterializeObject, comment: Option<&str>) -> String {
    format!(
        "COMMENT ON {} {} IS {};",
        object.object_type,
        object.qualified_name(),
        nullable_string(comment)
    )
}

/// `DROP <KIND> <qn>;`
pub fn drop_statement(object: &MaterializeObject) -> String {
    format!("DROP {} {};", object.object_type, object.qualified_name())
}

/// Issues statements for one object.
///
/// A successful [`DdlBuilder::rename`] re-points the builder at the new
/// name, so every statement issued afterwards addresses the renamed object.
pub struct DdlBuilder<'a> {
    exec: &'a dyn Executor,
    object: MaterializeObject,
}

impl<'a> DdlBuilder<'a> {
    pub fn new(exec: &'a dyn Executor, object: MaterializeObject) -> Self {
        Self { exec, object }
    }

    pub fn object(&self) -> &MaterializeObject {
        &self.object
    }

    pub fn executor(&self) -> &'a dyn Executor {
        self.exec
    }

    /// Execute a single statement.
    pub fn exec(&self, statement: &str) -> Result<()> {
        log::debug!("{statement}");
        self.exec.execute(statement)?;
        Ok(())
    }

    pub fn create(&self, config: &dyn CreateStatement) -> Result<()> {
        self.object.validate()?;
        self.exec(&config.create_statement(&self.object))
    }

    pub fn rename(&mut self, new_name: &str) -> Result<()> {
        self.exec(&rename_statement(&self.object, new_name))?;
        self.object = self.object.renamed(new_name);
        Ok(())
    }

    pub fn alter_owner(&self, role: &str) -> Result<()> {
        self.exec(&owner_statement(&self.object, role))
    }

    pub fn comment(&self, comment: Option<&str>) -> Result<()> {
        self.exec(&comment_statement(&self.object, comment))
    }

    pub fn drop(&self) -> Result<()> {
        self.exec(&drop_statement(&self.object))
    }

    /// Look up the catalog id of the object under its current name.
    pub fn read_id(&self) -> Result<String> {
        catalog::read_id(self.exec, &self.object)
    }
}
