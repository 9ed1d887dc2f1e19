mod set_ops_tests;
