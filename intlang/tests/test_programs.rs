mod common;

use common::{compile, run, run_with_input, Machine};
use intlang::{compile_str, constants::*, CompilerConf};

#[test]
fn test_print_sum() {
    assert_eq!(run("fn main() print(1+2) end"), vec![3]);
}

#[test]
fn test_global_variable() {
    assert_eq!(run("x = 5\nfn main() x = x + 1 print(x) end"), vec![6]);
}

#[test]
fn test_call_add() {
    let source = "fn add(a,b) a+b end\nfn main() print(add(3,4)) end";
    assert_eq!(run(source), vec![7]);
}

#[test]
fn test_list_index() {
    assert_eq!(run("fn main() a = [10,20,30] print(a[1]) end"), vec![20]);
}

#[test]
fn test_calls() {
    let image = compile(include_str!("calls.intl"));
    let mut machine = Machine::new(&image);
    let initial_sp = machine.sp();
    machine.run().unwrap();

    assert_eq!(machine.output, vec![1, 7, 2, 3, 8]);

    // The call to add between the two prints leaves the stack as it found it.
    assert_eq!(machine.sp_at_output[0], machine.sp_at_output[2]);
    assert_eq!(machine.sp(), initial_sp);
    assert_eq!(initial_sp, (DEFAULT_STACK_SIZE - REGISTER_COUNT - 1) as Word);
}

#[test]
fn test_lists() {
    assert_eq!(run(include_str!("lists.intl")), vec![20, 9, 2, 19]);
}

#[test]
fn test_branches() {
    assert_eq!(
        run(include_str!("branches.intl")),
        vec![10, 11, 12, 40, 41, 1, 0, -1]
    );
}

#[test]
fn test_recursion() {
    assert_eq!(run(include_str!("fib.intl")), vec![55]);
}

#[test]
fn test_right_associative_chains() {
    assert_eq!(run("fn main() print(10 - 3 - 2) end"), vec![9]);
    assert_eq!(run("fn main() print(64 / 8 / 2) end"), vec![16]);
    assert_eq!(run("fn main() print(2 * 3 + 4 * 5) end"), vec![26]);
    assert_eq!(run("fn main() print((10 - 3) - 2) end"), vec![5]);
}

#[test]
fn test_logical_operators() {
    let source = "
        fn main()
            print(not 0)
            print(not 5)
            print(not -5)
            print(1 and 0)
            print(1 and 1)
            print(0 or 0)
            print(1 or 0)
            print(not 1 < 0)
            print(1 < 2 and 3 > 2)
        end
    ";
    assert_eq!(run(source), vec![1, 0, 1, 0, 1, 0, 1, 1, 1]);
}

#[test]
fn test_input() {
    let source = "fn main() a = input() b = input() print(a * b) end";
    assert_eq!(run_with_input(source, &[6, 7]), vec![42]);
}

#[test]
fn test_print_returns_argument() {
    assert_eq!(run("fn main() print(print(4) + 1) end"), vec![4, 5]);
}

#[test]
fn test_function_values() {
    let source = "
        fn inc(x) x + 1 end
        fn twice(f, x) f(f(x)) end
        fn main()
            g = inc
            print(twice(g, 5))
            print(twice(inc, 0))
        end
    ";
    assert_eq!(run(source), vec![7, 2]);
}

#[test]
fn test_definition_order() {
    let source = "
        fn main() print(later(limit)) end
        fn later(n) n * 2 end
        limit = 21
    ";
    assert_eq!(run(source), vec![42]);
}

#[test]
fn test_return_value_is_last_statement() {
    let source = "
        fn last() 1 2 3 end
        fn assigned() v = 9 end
        fn main() print(last()) print(assigned()) end
    ";
    assert_eq!(run(source), vec![3, 9]);
}

#[test]
fn test_arguments_are_ordered() {
    let source = "
        fn sub(a, b, c) a - b - c end
        fn main() print(sub(100, 10, 1)) end
    ";
    // a - (b - c)
    assert_eq!(run(source), vec![91]);
}

#[test]
fn test_section_header() {
    let conf = CompilerConf {
        stack_size: 64,
        heap_size: 16,
    };
    let source = "fn main() print(_sections[0]) print(_sections[1]) print(_sections[3]) end";
    let image = compile_str(source, conf).unwrap();

    let mut machine = Machine::new(&image);
    machine.run().unwrap();

    let heap = image.section(intlang::layout::SectionKind::Heap);
    assert_eq!(machine.output, vec![0, 64, heap.start as Word]);
}

#[test]
fn test_global_list_pointer() {
    // A global can hold the location of a list in main's frame.
    let source = "
        table = 0
        fn fill() table[1] = 7 end
        fn main()
            table = [1, 2, 3]
            fill()
            print(table[1])
        end
    ";
    assert_eq!(run(source), vec![7]);
}

#[test]
fn test_later_definition_replaces_earlier() {
    let source = "
        fn f() 1 end
        fn f() 2 end
        x = 3
        x = 4
        fn main() print(f()) print(x) end
    ";
    assert_eq!(run(source), vec![2, 4]);
}

#[test]
fn test_store_to_function_name() {
    let source = "
        fn g() 1 end
        fn main()
            h = g
            g = 7
            print(h)
        end
    ";
    let image = compile(source);
    let mut machine = Machine::new(&image);
    machine.run().unwrap();

    // The function's first cell now holds the stored value.
    let g = machine.output[0] as usize;
    assert!(image.section(intlang::layout::SectionKind::Instructions).contains(&g));
    assert_eq!(machine.memory[g], 7);
}

#[test]
fn test_list_elements_evaluate_last_to_first() {
    let source = "
        fn main()
            a = [print(1), print(2), print(3)]
            print(a[0])
            print(a[2])
        end
    ";
    assert_eq!(run(source), vec![3, 2, 1, 1, 3]);
}
