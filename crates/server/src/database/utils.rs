/// Postgres enum DDL that tolerates the type already existing.
pub fn create_enum_type_statement<I, S>(type_name: &str, variants: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let values = variants
        .into_iter()
        .map(|v| format!("'{}'", v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DO $$ BEGIN CREATE TYPE {type_name} AS ENUM ({values}); \
         EXCEPTION WHEN duplicate_object THEN NULL; END $$;"
    )
}
