//! Module and Global Variables
//!
//! Defines the top-level module structure. A module is a plain value owned
//! by the caller; dropping it releases everything it contains. There is no
//! process-wide registry of loaded modules.

use serde::{Deserialize, Serialize};
use sift_common::SiftError;
use std::fmt;
use crate::{Function, IrType, Value};

/// Linkage types for global symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Linkage {
    External, // Visible to other modules
    Internal, // Only visible within this module
    Private,  // Not visible outside this function
}

/// Global variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub var_type: IrType,
    pub is_constant: bool,
    pub initializer: Option<Value>,
    pub linkage: Linkage,
}

/// IR Module - represents a complete compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub functions: Vec<Function>,
    pub globals: Vec<GlobalVariable>,
}

impl Module {
    pub fn new(name: String) -> Self {
        Self {
            name,
            functions: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    pub fn add_global(&mut self, global: GlobalVariable) {
        self.globals.push(global);
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        self.functions.iter_mut().find(|f| f.name == name)
    }

    pub fn get_global(&self, name: &str) -> Option<&GlobalVariable> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Deserialize a module from its JSON representation
    pub fn from_json(text: &str) -> Result<Module, SiftError> {
        serde_json::from_str(text).map_err(|e| SiftError::Json {
            message: e.to_string(),
        })
    }

    /// Serialize a module to JSON
    pub fn to_json(&self) -> Result<String, SiftError> {
        serde_json::to_string_pretty(self).map_err(|e| SiftError::Json {
            message: e.to_string(),
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; module {}", self.name)?;
        for global in &self.globals {
            let kind = if global.is_constant { "constant" } else { "global" };
            write!(f, "@{} = {} {}", global.name, kind, global.var_type)?;
            if let Some(init) = &global.initializer {
                write!(f, " {init}")?;
            }
            writeln!(f)?;
        }
        for function in &self.functions {
            writeln!(f, "{function}")?;
        }
        Ok(())
    }
}
