mod tests_registry;
mod tests_shared;
