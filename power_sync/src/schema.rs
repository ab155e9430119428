// Hand-written: `value` is NUMERIC on Postgres and REAL on SQLite, both mapped
// to Double so one table definition serves either backend.

diesel::table! {
    power_data (curve_name, curve_date) {
        #[max_length = 255]
        curve_name -> Varchar,
        curve_date -> Timestamp,
        value -> Nullable<Double>,
    }
}
