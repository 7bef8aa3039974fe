mod db_connection_test;
mod version_resolver_test;
