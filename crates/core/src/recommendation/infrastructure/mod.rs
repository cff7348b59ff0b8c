pub mod rule_table_loader;
