//! Diesel schema for the `staff` table.

diesel::table! {
    /// Staff members and their (nullable) supervisor.
    staff (id) {
        /// Primary key.
        id -> Integer,
        /// Display name, at most 64 characters.
        name -> Text,
        /// Supervisor's `id`; may form a cycle.
        supervisor_id -> Nullable<Integer>,
    }
}
