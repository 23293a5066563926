mod merge_fixtures;
