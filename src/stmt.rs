//! Statement factory: pairs rendered SQL with an external connection
//! capability and exposes typed fetch operations.
//!
//! The core performs no I/O of its own. Everything driver-shaped is
//! consumed through the narrow traits below; blocking, cancellation
//! and timeouts belong entirely to their implementations.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::render::Rendered;
use crate::types::Value;

/// A connection capable of preparing rendered SQL with positional
/// binds.
pub trait Connection {
    type Prepared: Prepared;

    fn prepare(&mut self, sql: &str) -> Result<Self::Prepared>;
}

/// A prepared statement handle: bind by 1-based position, then
/// execute.
pub trait Prepared {
    type Rows: RowCursor;

    fn bind(&mut self, position: usize, value: &Value) -> Result<()>;
    fn execute(&mut self) -> Result<Self::Rows>;
}

/// A forward-only row cursor. Not reentrant: close it before the next
/// fetch on the same statement.
pub trait RowCursor {
    fn next_row(&mut self) -> Result<Option<Row>>;
    fn close(&mut self) -> Result<()>;
}

/// One fetched row of logical values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// The value at a 0-based column index.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Converts between logical values and whatever the driver consumes
/// and produces.
pub trait TypeAdapter {
    fn to_native(&self, value: &Value) -> Result<Value>;
    fn from_native(&self, value: Value) -> Result<Value>;
}

/// Adapter for drivers that take logical values as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityAdapter;

impl TypeAdapter for IdentityAdapter {
    fn to_native(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn from_native(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

/// An executable statement: rendered SQL, its bind positions and the
/// current value per bind name.
///
/// Rebinding a value never re-renders the SQL; text and positions are
/// fixed at construction.
#[derive(Debug)]
pub struct Statement<C: Connection, A: TypeAdapter = IdentityAdapter> {
    conn: C,
    rendered: Rendered,
    adapter: A,
    values: HashMap<String, Value>,
}

impl<C: Connection> Statement<C> {
    pub fn new(conn: C, rendered: Rendered) -> Self {
        Self::with_adapter(conn, rendered, IdentityAdapter)
    }
}

impl<C: Connection, A: TypeAdapter> Statement<C, A> {
    pub fn with_adapter(conn: C, rendered: Rendered, adapter: A) -> Self {
        // Values captured at construction seed the value map.
        let values = rendered
            .binds
            .iter()
            .filter_map(|(name, var)| var.value.clone().map(|v| (name.clone(), v)))
            .collect();
        Self {
            conn,
            rendered,
            adapter,
            values,
        }
    }

    pub fn sql(&self) -> &str {
        &self.rendered.sql
    }

    /// Update the value bound under `name` before the next execute.
    pub fn bind_value(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if !self.rendered.binds.contains_key(name) {
            return Err(Error::UnknownBindName(name.to_string()));
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Prepare, bind every position and execute, returning the raw
    /// row cursor. Every declared bind must have received a value,
    /// either from the AST or through [`Statement::bind_value`].
    pub fn execute(&mut self) -> Result<<C::Prepared as Prepared>::Rows> {
        let mut prepared = self.conn.prepare(&self.rendered.sql)?;
        for bind in &self.rendered.bind_positions {
            // Every declared bind must carry a value by now; a missing
            // one must never degrade to SQL NULL.
            let value = self
                .values
                .get(&bind.name)
                .ok_or_else(|| Error::MissingBindValue(bind.name.clone()))?;
            let native = self.adapter.to_native(value)?;
            for &position in &bind.positions {
                prepared.bind(position, &native)?;
            }
        }
        prepared.execute()
    }

    /// Fetch exactly one mapped row; zero or more than one is an
    /// error. Closes the cursor on every path.
    pub fn fetch_one<T, F>(&mut self, mut map: F) -> Result<T>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let mut rows = self.execute()?;
        let result = Self::exactly_one(&mut rows, &self.adapter, &mut map);
        let closed = rows.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Like [`Statement::fetch_one`] but leaves cursor lifetime to the
    /// caller's connection management.
    pub fn fetch_one_no_close<T, F>(&mut self, mut map: F) -> Result<T>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let mut rows = self.execute()?;
        Self::exactly_one(&mut rows, &self.adapter, &mut map)
    }

    /// Fetch all mapped rows. Closes the cursor on every path.
    pub fn fetch<T, F>(&mut self, mut map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let mut rows = self.execute()?;
        let result = Self::drain(&mut rows, &self.adapter, &mut map);
        let closed = rows.close();
        let values = result?;
        closed?;
        Ok(values)
    }

    /// Like [`Statement::fetch`] but leaves cursor lifetime to the
    /// caller's connection management.
    pub fn fetch_no_close<T, F>(&mut self, mut map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let mut rows = self.execute()?;
        Self::drain(&mut rows, &self.adapter, &mut map)
    }

    /// Lazily map rows as they are pulled. The returned stream holds
    /// the open cursor; call [`RowStream::close`] on every path before
    /// the next fetch on this statement.
    pub fn stream<T, F>(&mut self, map: F) -> Result<RowStream<'_, <C::Prepared as Prepared>::Rows, A, F>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let rows = self.execute()?;
        Ok(RowStream {
            rows,
            adapter: &self.adapter,
            map,
            done: false,
        })
    }

    fn adapt(adapter: &A, row: Row) -> Result<Row> {
        let values = row
            .values
            .into_iter()
            .map(|v| adapter.from_native(v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Row::new(values))
    }

    fn exactly_one<T, F>(rows: &mut <C::Prepared as Prepared>::Rows, adapter: &A, map: &mut F) -> Result<T>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let first = match rows.next_row()? {
            Some(row) => row,
            None => return Err(Error::NotExactlyOneRow { got: 0 }),
        };
        if rows.next_row()?.is_some() {
            return Err(Error::NotExactlyOneRow { got: 2 });
        }
        map(&Self::adapt(adapter, first)?)
    }

    fn drain<T, F>(rows: &mut <C::Prepared as Prepared>::Rows, adapter: &A, map: &mut F) -> Result<Vec<T>>
    where
        F: FnMut(&Row) -> Result<T>,
    {
        let mut out = Vec::new();
        while let Some(row) = rows.next_row()? {
            out.push(map(&Self::adapt(adapter, row)?)?);
        }
        Ok(out)
    }
}

/// Lazy row sequence over an open cursor.
pub struct RowStream<'a, R: RowCursor, A: TypeAdapter, F> {
    rows: R,
    adapter: &'a A,
    map: F,
    done: bool,
}

impl<'a, R: RowCursor, A: TypeAdapter, F> RowStream<'a, R, A, F> {
    /// Close the underlying cursor. Required on all paths, including
    /// after an error or early abandonment.
    pub fn close(mut self) -> Result<()> {
        self.rows.close()
    }
}

impl<'a, R, A, F, T> Iterator for RowStream<'a, R, A, F>
where
    R: RowCursor,
    A: TypeAdapter,
    F: FnMut(&Row) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.rows.next_row() {
            Ok(Some(row)) => {
                let adapted = row
                    .values
                    .into_iter()
                    .map(|v| self.adapter.from_native(v))
                    .collect::<Result<Vec<_>>>();
                match adapted {
                    Ok(values) => Some((self.map)(&Row::new(values))),
                    Err(e) => {
                        self.done = true;
                        Some(Err(e))
                    }
                }
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
