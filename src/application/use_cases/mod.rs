pub mod split_sql_script;
