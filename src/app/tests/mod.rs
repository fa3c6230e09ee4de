mod reader_flow;
