/// Builds a [`NavigableRole`](crate::schema::NavigableRole) from a root and a
/// sequence of parts.
///
/// ```
/// let role = relkey::role!("Order", "lines", "{key}");
/// assert_eq!(role.full_path(), "Order.lines.{key}");
/// ```
#[macro_export]
macro_rules! role {
    ( $root:expr $( , $part:expr )* ) => {
        $crate::schema::NavigableRole::new($root) $( .append($part) )*
    };
}
