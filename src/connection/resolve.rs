use std::collections::HashMap;
use std::fmt::Write;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::describe::{Described, ParseError};
use crate::connection::PgConnection;
use crate::desugar::desugar;
use crate::error::Result;
use crate::message::Field;

/// A single result column with its resolved type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnColumn {
    /// The output name of the column, as reported by the server.
    pub name: String,

    /// The name of the backing table column, if the column originates
    /// directly from one. Computed and expression columns have none.
    pub column_name: Option<String>,

    /// The catalog name of the column's type, e.g. `int4` or `text`.
    pub type_name: String,

    /// Whether the backing column admits NULL. Unset when there is no
    /// backing column; never defaulted.
    pub nullable: Option<bool>,
}

/// The resolved parameter and return types of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTypes {
    /// Type name per placeholder name. When a name is used more than once,
    /// the later occurrence wins.
    pub param_types: HashMap<String, String>,

    /// One entry per result column, in result order.
    pub return_types: Vec<ReturnColumn>,
}

/// The outcome of resolving a query's types.
#[derive(Debug, Clone)]
pub enum TypeResolution {
    Resolved(ResolvedTypes),

    /// The server rejected the query during parsing. No catalog queries
    /// were issued.
    Failed(ParseError),
}

impl<S> PgConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Resolves the parameter and result-column types of a query with named
    /// placeholders.
    ///
    /// The query is desugared to positional parameters, probed (parsed and
    /// described, never executed), and the resulting type OIDs and table
    /// references are cross-referenced against `pg_catalog.pg_type` and
    /// `pg_catalog.pg_attribute`.
    ///
    /// The whole call is one critical section over the connection: probe
    /// plus two catalog round trips, with strict request/reply ordering
    /// throughout.
    pub async fn resolve_types(&mut self, query: &str, statement: &str) -> Result<TypeResolution> {
        let desugared = desugar(query);

        let described = match self.describe_statement(statement, &desugared.sql).await? {
            Described::Statement(described) => described,

            // a rejected parse short-circuits the whole pipeline
            Described::Failed(error) => return Ok(TypeResolution::Failed(error)),
        };

        if described.parameters.len() != desugared.names.len() {
            return Err(err_protocol!(
                "statement reports {} parameters but {} placeholders were rewritten",
                described.parameters.len(),
                desugared.names.len()
            ));
        }

        // parameters and fields can share a type; the map is keyed by
        // distinct OID, so repetition in this list is harmless
        let mut oids: Vec<u32> = described.parameters.clone();
        oids.extend(described.fields.iter().map(|field| field.data_type_id));

        let type_names = self.fetch_type_names(&oids).await?;
        let attributes = self.fetch_attributes(&described.fields).await?;

        let mut return_types = Vec::with_capacity(described.fields.len());

        for field in &described.fields {
            let attribute = attributes.get(&(field.relation_id, field.relation_attribute_no));

            return_types.push(ReturnColumn {
                name: field.name.clone(),
                column_name: attribute.map(|attribute| attribute.column_name.clone()),
                type_name: type_name_for(&type_names, field.data_type_id)?,
                nullable: attribute.map(|attribute| attribute.nullable),
            });
        }

        let mut param_types = HashMap::with_capacity(desugared.names.len());

        for (name, &oid) in desugared.names.iter().zip(&described.parameters) {
            // last-write-wins when a placeholder name repeats
            param_types.insert(name.clone(), type_name_for(&type_names, oid)?);
        }

        Ok(TypeResolution::Resolved(ResolvedTypes {
            param_types,
            return_types,
        }))
    }

    /// Looks up the catalog name of every distinct type OID in `oids`.
    async fn fetch_type_names(&mut self, oids: &[u32]) -> Result<HashMap<u32, String>> {
        if oids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut sql = String::from("SELECT oid, typname FROM pg_catalog.pg_type WHERE oid IN (");

        for (i, oid) in oids.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }

            let _ = write!(sql, "{}", oid);
        }

        sql.push(')');

        let mut names = HashMap::new();

        for row in self.fetch_all(&sql).await? {
            let oid = required(&row, 0)?
                .parse()
                .map_err(|_| err_protocol!("pg_type.oid is not an integer: {:?}", row[0]))?;

            names.insert(oid, required(&row, 1)?.to_owned());
        }

        Ok(names)
    }

    /// Looks up column name and not-null flag for every field backed by a
    /// table column.
    async fn fetch_attributes(
        &mut self,
        fields: &[Field],
    ) -> Result<HashMap<(u32, i16), Attribute>> {
        let mut sql = String::from(
            "SELECT attrelid, attnum, attname, attnotnull \
             FROM pg_catalog.pg_attribute WHERE ",
        );

        let mut any = false;

        for field in fields {
            // zero means the field does not originate from a table column
            if field.relation_id == 0 {
                continue;
            }

            if any {
                sql.push_str(" OR ");
            }

            let _ = write!(
                sql,
                "(attrelid = {} AND attnum = {})",
                field.relation_id, field.relation_attribute_no
            );

            any = true;
        }

        if !any {
            // degenerate predicate: still issue a well-formed query that
            // returns no rows
            sql.push_str("false");
        }

        let mut attributes = HashMap::new();

        for row in self.fetch_all(&sql).await? {
            let relation_id = required(&row, 0)?
                .parse()
                .map_err(|_| err_protocol!("pg_attribute.attrelid is not an integer"))?;

            let attribute_no = required(&row, 1)?
                .parse()
                .map_err(|_| err_protocol!("pg_attribute.attnum is not an integer"))?;

            // booleans arrive in their text representation; only the `t`
            // marker means the column is NOT NULL
            let not_null = required(&row, 3)? == "t";

            attributes.insert(
                (relation_id, attribute_no),
                Attribute {
                    column_name: required(&row, 2)?.to_owned(),
                    nullable: !not_null,
                },
            );
        }

        Ok(attributes)
    }
}

#[derive(Debug)]
struct Attribute {
    column_name: String,
    nullable: bool,
}

fn type_name_for(names: &HashMap<u32, String>, oid: u32) -> Result<String> {
    names
        .get(&oid)
        .cloned()
        .ok_or_else(|| err_protocol!("catalog returned no type name for oid {}", oid))
}

fn required(row: &[Option<String>], index: usize) -> Result<&str> {
    row.get(index)
        .and_then(|value| value.as_deref())
        .ok_or_else(|| err_protocol!("unexpected NULL in catalog row at column {}", index))
}
