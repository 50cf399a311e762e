//! Contract registry
//!
//! Holds every contract by name. The process-wide registry returned by
//! [`registry`] is built once on first use and is read-only afterwards, so
//! concurrently running scenarios all validate against identical shapes.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Contract, ContractError, Field, Pattern, Shape};

/// Names of the built-in Book Library contracts
pub mod names {
    pub const BOOK: &str = "book";
    pub const BOOK_PARTIAL: &str = "book.partial";
    pub const BOOK_ENVELOPE: &str = "book.envelope";
    pub const BOOK_PARTIAL_ENVELOPE: &str = "book.partial.envelope";
    pub const BOOK_LIST: &str = "book.list";
    pub const BOOK_LIST_ENVELOPE: &str = "book.list.envelope";
    pub const BOOK_DELETED: &str = "book.deleted";
    pub const AUTH_USER: &str = "auth.user";
    pub const AUTH_LOGIN: &str = "auth.login";
    pub const ERROR: &str = "error";
    pub const ERROR_ROUTE_NOT_FOUND: &str = "error.route_not_found";
}

/// Digits, hyphens and spaces; 10 to 17 characters in total
static ISBN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\- ]{10,17}$").unwrap());

static BOOK_LIBRARY: Lazy<ContractRegistry> = Lazy::new(ContractRegistry::book_library);

/// The shared, immutable registry of Book Library contracts
pub fn registry() -> &'static ContractRegistry {
    &BOOK_LIBRARY
}

/// ISBN format accepted by the service
pub fn isbn_pattern() -> Pattern {
    Pattern::new("ISBN (10-17 digits, hyphens or spaces)", ISBN_REGEX.clone())
}

/// Named collection of contracts
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, Contract>,
}

impl ContractRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contract under its own name
    ///
    /// A name can be defined only once; redefining it would let a contract
    /// change shape in the middle of a run.
    pub fn define(&mut self, contract: Contract) -> Result<&Contract, ContractError> {
        use std::collections::btree_map::Entry;

        match self.contracts.entry(contract.name().to_string()) {
            Entry::Occupied(entry) => Err(ContractError::DuplicateName(entry.key().clone())),
            Entry::Vacant(entry) => Ok(entry.insert(contract)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Contract> {
        self.contracts.get(name)
    }

    /// Like [`get`](Self::get) but unknown names are an error
    pub fn expect(&self, name: &str) -> Result<&Contract, ContractError> {
        self.get(name)
            .ok_or_else(|| ContractError::Unknown(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Build the Book Library contract set
    pub fn book_library() -> Self {
        let book = book_contract();
        let user = Contract::object(
            names::AUTH_USER,
            vec![Field::required("username", Shape::non_empty_string())],
        );
        let login = Contract::object(
            names::AUTH_LOGIN,
            vec![
                Field::required("message", Shape::string()),
                Field::required("token", Shape::non_empty_string()),
                Field::required("user", user.shape().clone()),
            ],
        );
        let deleted = Contract::object(
            names::BOOK_DELETED,
            vec![
                Field::required("success", Shape::Boolean),
                Field::required("message", Shape::string()),
                Field::required("deletedId", Shape::Identifier),
            ],
        );
        let error = Contract::object(
            names::ERROR,
            vec![
                Field::required("error", Shape::non_empty_string()),
                Field::required("message", Shape::string()),
            ],
        );
        let route_not_found = Contract::object(
            names::ERROR_ROUTE_NOT_FOUND,
            vec![
                Field::required("error", Shape::non_empty_string()),
                Field::required("message", Shape::string()),
                Field::required("availableEndpoints", Shape::array_of(Shape::Any)),
            ],
        );

        let partial = book.partial();
        let list = book.list_of();
        let contracts = vec![
            book.envelope_of(),
            partial.envelope_of(),
            list.envelope_of(),
            partial,
            list,
            book,
            deleted,
            user,
            login,
            error,
            route_not_found,
        ];

        Self {
            contracts: contracts
                .into_iter()
                .map(|c| (c.name().to_string(), c))
                .collect(),
        }
    }
}

/// Book resource as returned by the service
fn book_contract() -> Contract {
    Contract::object(
        names::BOOK,
        vec![
            Field::required("id", Shape::Identifier),
            Field::required("title", Shape::non_empty_string()),
            Field::required("author", Shape::non_empty_string()),
            Field::required("isbn", Shape::matching(isbn_pattern())),
            Field::optional("publishedYear", Shape::integer()).nullable(),
            Field::required("available", Shape::Boolean),
        ],
    )
}
