// ============================================================================
// spark-cocomp - Ergonomic Macros
// ============================================================================

/// Build a [`Model`](crate::Model) from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so anything it accepts works.
/// The expansion reaches `serde_json` through this crate, so callers do not
/// need their own dependency on it.
///
/// # Usage
///
/// ```rust
/// use spark_cocomp::model;
///
/// let apple = model! { "id" => 1, "name" => "apple", "tags" => ["red"] };
/// assert_eq!(apple.get("name"), Some(serde_json::json!("apple")));
///
/// let blank = model! {};
/// assert_eq!(blank.id(), None);
/// ```
#[macro_export]
macro_rules! model {
    () => {
        $crate::Model::new()
    };
    ($($key:expr => $value:tt),+ $(,)?) => {{
        let mut attributes = $crate::__serde_json::Map::new();
        $( attributes.insert(::std::string::String::from($key), $crate::__serde_json::json!($value)); )+
        $crate::Model::from_attributes(attributes)
    }};
}

/// Helper macro to clone variables into a move closure.
///
/// Handy for notification handlers that capture shared collections or logs.
///
/// # Usage
///
/// ```rust
/// use spark_cocomp::{cloned, model};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let hits = Rc::new(Cell::new(0));
/// let apple = model! { "id" => 1 };
///
/// apple.on("membership:in", cloned!(hits => move |_| hits.set(hits.get() + 1)));
/// assert_eq!(hits.get(), 0);
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}
