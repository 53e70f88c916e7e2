use std::fmt;

/// The fixed reply to [`Request::Ping`].
pub const PONG: &str = "pong";

/// Messages a unit understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Pure round-trip, answered with [`PONG`].
    Ping,
    /// Asks the unit for the index it was constructed with.
    GetIndex,
    /// Asks the unit to reduce a batch to `Σ x²`.
    SumOfSquares(Vec<i64>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Pong(&'static str),
    Index(usize),
    Sum(i64),
    /// `Σ x²` of the batch does not fit in an `i64`.
    Overflow,
}

impl Reply {
    pub fn into_pong(self) -> Result<&'static str, Reply> {
        match self {
            Reply::Pong(pong) => Ok(pong),
            other => Err(other),
        }
    }

    pub fn into_index(self) -> Result<usize, Reply> {
        match self {
            Reply::Index(index) => Ok(index),
            other => Err(other),
        }
    }

    pub fn into_sum(self) -> Result<i64, Reply> {
        match self {
            Reply::Sum(sum) => Ok(sum),
            other => Err(other),
        }
    }

    /// Like [`Reply::into_sum`], with [`Reply::Overflow`] mapped to `None`.
    pub fn into_partial_sum(self) -> Result<Option<i64>, Reply> {
        match self {
            Reply::Sum(sum) => Ok(Some(sum)),
            Reply::Overflow => Ok(None),
            other => Err(other),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Pong(pong) => write!(f, "{pong}"),
            Reply::Index(index) => write!(f, "index {index}"),
            Reply::Sum(sum) => write!(f, "sum {sum}"),
            Reply::Overflow => f.write_str("overflow"),
        }
    }
}

/// The behavior behind every unit. A unit carries nothing but its index, so
/// handling a request never mutates it and any runtime may call it from
/// whatever task owns the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    index: usize,
}

impl Unit {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    pub fn ping(&self) -> &'static str {
        PONG
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// `None` when the sum, or any single square, overflows an `i64`.
    pub fn reduce_sum_of_squares(&self, batch: &[i64]) -> Option<i64> {
        batch
            .iter()
            .try_fold(0i64, |acc, x| acc.checked_add(x.checked_mul(*x)?))
    }

    /// Dispatches a request to the matching operation.
    pub fn handle(&self, request: Request) -> Reply {
        match request {
            Request::Ping => Reply::Pong(self.ping()),
            Request::GetIndex => Reply::Index(self.index()),
            Request::SumOfSquares(batch) => self
                .reduce_sum_of_squares(&batch)
                .map_or(Reply::Overflow, Reply::Sum),
        }
    }
}

/// An address to a live unit plus the index it was created with.
///
/// Can be cloned to obtain another handle to the same unit. The index never
/// changes for the lifetime of the handle.
#[derive(Clone, Debug)]
pub struct UnitHandle<A> {
    address: A,
    index: usize,
}

impl<A> UnitHandle<A> {
    pub fn new(address: A, index: usize) -> Self {
        Self { address, index }
    }

    pub fn address(&self) -> &A {
        &self.address
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
