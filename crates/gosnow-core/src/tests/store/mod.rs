mod json_store;
