/// A struct whose fields render as one row of a tabular export.
///
/// Implemented through `#[derive(TableRow)]`; the header of each column is the
/// field name unless a `#[column("...")]` attribute overrides it.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

pub trait ToCell {
    fn to_cell(&self) -> String;
}

impl ToCell for String {
    fn to_cell(&self) -> String {
        self.clone()
    }
}

impl ToCell for &str {
    fn to_cell(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_to_cell_for_number {
    ($($ty:ty),*) => {
        $(
            impl ToCell for $ty {
                fn to_cell(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_to_cell_for_number!(i32, i64, u32, u64, usize);

impl<T: ToCell> ToCell for Option<T> {
    fn to_cell(&self) -> String {
        self.as_ref()
            .map(|value| value.to_cell())
            .unwrap_or(String::from("N/A"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl Table {
    pub fn new(head: &[&str], body: Vec<Vec<String>>) -> Self {
        Self {
            head: head.iter().map(|h| h.to_string()).collect(),
            body,
        }
    }

    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        Self::new(&R::headers(), rows.iter().map(|row| row.cells()).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
