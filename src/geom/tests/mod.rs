mod test_bezier_basic;
mod test_bspline_basic;
