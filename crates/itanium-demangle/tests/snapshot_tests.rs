//! Snapshot tests for demangled output.
//!
//! A batch of symbols as a typical GCC-built C++ binary exports them, rendered
//! one per line. Any change in spacing, qualifier order or template brackets
//! shows up as a snapshot diff.
//!
//! To update snapshots when making intentional changes, run:
//! ```bash
//! cargo insta review
//! ```

use itanium_demangle::{demangle, demangle_with, DemangleOptions};

const SYMBOLS: &[&str] = &[
    "_ZN6Widget4drawERKS_",
    "_ZNK6Widget5widthEv",
    "_ZN6WidgetC2ERKS_",
    "_ZN6WidgetD0Ev",
    "_ZTV6Widget",
    "_ZTI6Widget",
    "_ZThn16_N6Widget4drawERKS_",
    "_ZNSt6vectorIiSaIiEE9push_backERKi",
    "_Z4sortIPiEvT_T_",
    "_Z8dispatchPFvPvES_",
    "_ZN12_GLOBAL__N_16helperEv.isra.0",
    "_Z7processA4_A4_f",
    "_Z9transformRKSt6vectorIdSaIdEEPFddE",
];

fn render(options: &DemangleOptions) -> String {
    SYMBOLS
        .iter()
        .map(|s| demangle_with(s, options))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_default_rendering() {
    insta::assert_snapshot!(render(&DemangleOptions::default()), @r###"
    Widget::draw(const Widget&)
    Widget::width() const
    Widget::Widget(const Widget&)
    Widget::~Widget()
    vtable for Widget
    typeinfo for Widget
    non-virtual thunk to Widget::draw(const Widget&)
    std::vector<int, std::allocator<int>>::push_back(const int&)
    void sort<int*>(int*, int*)
    dispatch(void (*)(void*), _)
    (anonymous namespace)::helper()
    process(float[4][4])
    transform(const std::vector<double, std::allocator<double>>&, double (*)(double))
    "###);
}

#[test]
fn snapshot_name_only_rendering() {
    insta::assert_snapshot!(render(&DemangleOptions::name_only()), @r###"
    Widget::draw
    Widget::width
    Widget::Widget
    Widget::~Widget
    vtable for Widget
    typeinfo for Widget
    non-virtual thunk to Widget::draw
    std::vector<int, std::allocator<int>>::push_back
    sort<int*>
    dispatch
    (anonymous namespace)::helper
    process
    transform
    "###);
}

#[test]
fn snapshot_unmangled_passthrough() {
    let lines: Vec<String> = ["main", "_start", "__libc_csu_init", "?foo@@YAXXZ"]
        .iter()
        .map(|s| demangle(s))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r###"
    main
    _start
    __libc_csu_init
    ?foo@@YAXXZ
    "###);
}
