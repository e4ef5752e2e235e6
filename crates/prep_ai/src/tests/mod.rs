mod fake_provider;
