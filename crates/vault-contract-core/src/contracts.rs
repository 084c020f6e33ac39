// crates/vault-contract-core/src/contracts.rs
// ============================================================================
// Module: Endpoint Contracts
// Description: Registry of response contracts for the vault item API.
// Purpose: Load every contract once and hand out read-only references.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! One [`SchemaContract`] exists per endpoint + outcome pair. The built-in
//! registry is constructed on first use and shared for the process lifetime;
//! [`ContractRegistry::load_dir`] loads an override set from JSON files named
//! `<contract_id>.json`, falling back to the built-in contract for any file
//! that is absent.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::schema::ObjectContract;
use crate::schema::SchemaContract;
use crate::schema::Shape;

/// Maximum accepted size of a single contract file.
const MAX_CONTRACT_FILE_BYTES: u64 = 256 * 1024;

/// Contract identifiers, one per endpoint + outcome pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractId {
    /// `POST /v1/user/login` success body.
    LoginSuccess,
    /// `GET /user/items` success body.
    ItemsList,
    /// `GET /user/{id}/item` success body.
    ItemDetail,
    /// `POST /user/item` success body.
    ItemCreated,
    /// Error body shared by 401/403 responses.
    ErrorBody,
}

impl ContractId {
    /// Every contract identifier in registry order.
    pub const ALL: [Self; 5] =
        [Self::LoginSuccess, Self::ItemsList, Self::ItemDetail, Self::ItemCreated, Self::ErrorBody];

    /// Returns the stable identifier string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::ItemsList => "items_list",
            Self::ItemDetail => "item_detail",
            Self::ItemCreated => "item_created",
            Self::ErrorBody => "error_body",
        }
    }
}

/// Contract loading failures.
#[derive(Debug, Error)]
pub enum ContractError {
    /// Contract file could not be read.
    #[error("contract io error for {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Contract file is not a valid contract document.
    #[error("contract parse error for {path}: {message}")]
    Parse {
        /// File path.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Contract file declares a different identifier than its name.
    #[error("contract file {path} declares id {found}, expected {expected}")]
    IdMismatch {
        /// File path.
        path: String,
        /// Identifier implied by the file name.
        expected: String,
        /// Identifier found in the document.
        found: String,
    },
}

/// Immutable set of endpoint contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRegistry {
    /// Login success contract.
    login_success: SchemaContract,
    /// Items listing contract.
    items_list: SchemaContract,
    /// Item detail contract.
    item_detail: SchemaContract,
    /// Created item contract.
    item_created: SchemaContract,
    /// Error body contract.
    error_body: SchemaContract,
}

impl ContractRegistry {
    /// Returns the process-wide built-in registry.
    #[must_use]
    pub fn builtin() -> &'static Self {
        /// Lazily built built-in registry.
        static REGISTRY: OnceLock<ContractRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| Self {
            login_success: builtin_contract(ContractId::LoginSuccess),
            items_list: builtin_contract(ContractId::ItemsList),
            item_detail: builtin_contract(ContractId::ItemDetail),
            item_created: builtin_contract(ContractId::ItemCreated),
            error_body: builtin_contract(ContractId::ErrorBody),
        })
    }

    /// Loads contracts from `<dir>/<contract_id>.json`, defaulting missing files.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when a present file cannot be read, parsed,
    /// or declares a mismatched identifier.
    pub fn load_dir(dir: &Path) -> Result<Self, ContractError> {
        Ok(Self {
            login_success: load_contract(dir, ContractId::LoginSuccess)?,
            items_list: load_contract(dir, ContractId::ItemsList)?,
            item_detail: load_contract(dir, ContractId::ItemDetail)?,
            item_created: load_contract(dir, ContractId::ItemCreated)?,
            error_body: load_contract(dir, ContractId::ErrorBody)?,
        })
    }

    /// Returns the contract for an identifier.
    #[must_use]
    pub const fn get(&self, id: ContractId) -> &SchemaContract {
        match id {
            ContractId::LoginSuccess => &self.login_success,
            ContractId::ItemsList => &self.items_list,
            ContractId::ItemDetail => &self.item_detail,
            ContractId::ItemCreated => &self.item_created,
            ContractId::ErrorBody => &self.error_body,
        }
    }

    /// Iterates contracts in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (ContractId, &SchemaContract)> {
        ContractId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

/// Loads one contract file, falling back to the built-in contract.
fn load_contract(dir: &Path, id: ContractId) -> Result<SchemaContract, ContractError> {
    let path = dir.join(format!("{}.json", id.as_str()));
    if !path.is_file() {
        return Ok(builtin_contract(id));
    }
    let display = path.display().to_string();
    let io_error = |err: std::io::Error| ContractError::Io {
        path: display.clone(),
        message: err.to_string(),
    };
    let size = fs::metadata(&path).map_err(io_error)?.len();
    if size > MAX_CONTRACT_FILE_BYTES {
        return Err(ContractError::Io {
            path: display,
            message: "contract file exceeds size limit".to_string(),
        });
    }
    let bytes = fs::read(&path).map_err(io_error)?;
    let contract: SchemaContract =
        serde_json::from_slice(&bytes).map_err(|err| ContractError::Parse {
            path: display.clone(),
            message: err.to_string(),
        })?;
    if contract.id != id.as_str() {
        return Err(ContractError::IdMismatch {
            path: display,
            expected: id.as_str().to_string(),
            found: contract.id,
        });
    }
    Ok(contract)
}

/// Builds the built-in contract for an identifier.
fn builtin_contract(id: ContractId) -> SchemaContract {
    let root = match id {
        ContractId::LoginSuccess => ObjectContract::new().required("token", Shape::String).into_shape(),
        ContractId::ItemsList => Shape::array(
            ObjectContract::new().required("items", Shape::array(Shape::String)).into_shape(),
        ),
        ContractId::ItemDetail | ContractId::ItemCreated => Shape::array(item_shape()),
        ContractId::ErrorBody => {
            Shape::array(ObjectContract::new().required("error", Shape::String).into_shape())
        }
    };
    SchemaContract::new(id.as_str(), root)
}

/// Item with its file descriptors and custom fields.
fn item_shape() -> Shape {
    let file = ObjectContract::new()
        .required("id", Shape::String)
        .required("name", Shape::String)
        .required("size", Shape::Integer)
        .required("content_path", Shape::String)
        .into_shape();
    let field = ObjectContract::new()
        .required("id", Shape::String)
        .required("label", Shape::String)
        .required("type", Shape::String)
        .required("value", Shape::Any)
        .into_shape();
    ObjectContract::new()
        .required("id", Shape::String)
        .required("title", Shape::String)
        .required("tags", Shape::array(Shape::String))
        .required("files", Shape::array(file))
        .required("fields", Shape::array(field))
        .into_shape()
}
