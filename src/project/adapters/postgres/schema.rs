//! Diesel schema for project and task persistence.

diesel::table! {
    /// Project records.
    projects (id) {
        /// Project identifier.
        id -> Integer,
        /// Project name; unique at the storage level as a backstop, though
        /// uniqueness is enforced by the service.
        #[max_length = 30]
        name -> Varchar,
        /// Free-form description, empty when absent.
        #[max_length = 150]
        description -> Varchar,
        /// Creation timestamp, assigned by the database.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records owned by projects.
    tasks (id) {
        /// Task identifier.
        id -> Integer,
        /// Owning project; rows cascade on project deletion.
        project_id -> Integer,
        /// Task title.
        #[max_length = 30]
        title -> Varchar,
        /// Free-form description, empty when absent.
        #[max_length = 150]
        description -> Varchar,
        /// Workflow status in canonical string form.
        #[max_length = 10]
        status -> Varchar,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Creation timestamp, assigned by the database.
        created_at -> Timestamptz,
        /// Closing timestamp, set while the task is done.
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(tasks -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
