use emu_sentinel::{
    BREAKPOINT_OPCODE, Error, HookContext, HookTable, Machine, MemoryImage, SentinelEvents,
};

const HOOK_ADDR: u16 = 0x8000;

fn machine_with(code: &[u8]) -> Machine {
    let mut ram = vec![0u8; 0xC000];
    let start = usize::from(HOOK_ADDR - 0x4000);
    ram[start..start + code.len()].copy_from_slice(code);
    let memory = MemoryImage::new(&[0; 0x4000], &ram).expect("memory");
    let mut machine = Machine::new(memory);
    machine.regs_mut().sp = 0xFF00;
    machine.jump(HOOK_ADDR);
    machine
}

/// Handlers in these tests report through the tune event: the tune
/// number is whatever the handler wants to record.
#[derive(Default)]
struct Calls {
    values: Vec<u8>,
}

impl SentinelEvents for Calls {
    fn on_play_tune(&mut self, tune: u8) {
        self.values.push(tune);
    }
}

fn record_call(_: &mut Machine, ctx: &mut HookContext<'_>) {
    ctx.events.on_play_tune(0);
}

/// Runs a single trap at PC.
fn trigger(table: &HookTable, machine: &mut Machine) -> (Result<(), Error>, Calls) {
    let mut calls = Calls::default();
    let mut code = 0;
    let mut context = HookContext {
        events: &mut calls,
        secret_code_bcd: &mut code,
    };
    let pc = machine.pc();
    let result = table.trigger(machine, &mut context, pc);
    (result, calls)
}

#[test]
fn registration_installs_breakpoint() {
    let mut machine = machine_with(&[0x3E, 0x42]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x3E, |_, _| {})
        .expect("register");

    assert_eq!(machine.memory().peek(HOOK_ADDR), BREAKPOINT_OPCODE);
    assert_eq!(table.original_opcode(HOOK_ADDR), Some(0x3E));
    assert!(table.contains(HOOK_ADDR));
    assert_eq!(table.addresses().collect::<Vec<_>>(), vec![HOOK_ADDR]);
}

#[test]
fn registration_checks_expected_opcode() {
    let mut machine = machine_with(&[0x3E, 0x42]);
    let mut table = HookTable::new();
    let err = table
        .register(machine.memory_mut(), HOOK_ADDR, 0xCD, |_, _| {})
        .unwrap_err();

    assert!(matches!(
        err,
        Error::IncompatibleHook {
            address: HOOK_ADDR,
            expected: 0xCD,
            found: 0x3E,
        }
    ));
    assert_eq!(machine.memory().peek(HOOK_ADDR), 0x3E);
    assert!(table.is_empty());
}

#[test]
fn registration_refuses_rom() {
    let mut machine = machine_with(&[]);
    let mut table = HookTable::new();
    let err = table
        .register(machine.memory_mut(), 0x0038, 0x00, |_, _| {})
        .unwrap_err();
    assert!(matches!(err, Error::HookInRom { address: 0x0038 }));
}

#[test]
fn hook_in_place_runs_the_real_instruction() {
    // LD A,0x42 (7 T-states)
    let mut machine = machine_with(&[0x3E, 0x42]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x3E, record_call)
        .expect("register");

    let (result, calls) = trigger(&table, &mut machine);
    result.expect("trigger");

    assert_eq!(calls.values.len(), 1);
    assert_eq!(machine.regs().a, 0x42);
    assert_eq!(machine.pc(), HOOK_ADDR + 2);
    assert_eq!(machine.cycles(), 7);
    assert_eq!(machine.memory().peek(HOOK_ADDR), BREAKPOINT_OPCODE);
}

#[test]
fn redirecting_hook_skips_the_instruction() {
    let mut machine = machine_with(&[0x3E, 0x42]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x3E, |m, _| m.jump(0x9000))
        .expect("register");

    let a = machine.regs().a;
    let (result, _) = trigger(&table, &mut machine);
    result.expect("trigger");

    assert_eq!(machine.pc(), 0x9000);
    assert_eq!(machine.regs().a, a);
    assert_eq!(machine.cycles(), 0);
    assert_eq!(machine.memory().peek(HOOK_ADDR), BREAKPOINT_OPCODE);
}

#[test]
fn handler_sees_the_original_opcode() {
    let mut machine = machine_with(&[0x3E, 0x42]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x3E, |m, ctx| {
            ctx.events.on_play_tune(m.memory().peek(m.pc()));
        })
        .expect("register");

    let (result, calls) = trigger(&table, &mut machine);
    result.expect("trigger");
    assert_eq!(calls.values, vec![0x3E]);
}

#[test]
fn stray_breakpoint_is_ld_h_h() {
    let mut machine = machine_with(&[BREAKPOINT_OPCODE]);
    machine.regs_mut().h = 0x12;
    let table = HookTable::new();

    let r = machine.regs().r;

    let (result, calls) = trigger(&table, &mut machine);
    result.expect("trigger");

    assert!(calls.values.is_empty());
    assert_eq!(machine.pc(), HOOK_ADDR + 1);
    assert_eq!(machine.cycles(), 4);
    assert_eq!(machine.regs().h, 0x12);
    // Executed as a real instruction: one M1 cycle.
    assert_eq!(machine.regs().r, r.wrapping_add(1) & 0x7F);
    assert_eq!(machine.memory().peek(HOOK_ADDR), BREAKPOINT_OPCODE);
}

#[test]
fn self_looping_instruction_cannot_be_hooked() {
    // JR $
    let mut machine = machine_with(&[0x18, 0xFE]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x18, |_, _| {})
        .expect("register");

    let (result, _) = trigger(&table, &mut machine);
    assert!(matches!(
        result,
        Err(Error::SingleStepStalled { address: HOOK_ADDR })
    ));
    assert_eq!(machine.memory().peek(HOOK_ADDR), BREAKPOINT_OPCODE);
}

#[test]
fn repeating_block_instruction_stalls() {
    // LDIR with BC > 1 repeats itself
    let mut machine = machine_with(&[0xED, 0xB0]);
    machine.regs_mut().set_bc(0x0010);
    machine.regs_mut().set_hl(0x9000);
    machine.regs_mut().set_de(0xA000);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0xED, |_, _| {})
        .expect("register");

    let (result, _) = trigger(&table, &mut machine);
    assert!(matches!(result, Err(Error::SingleStepStalled { .. })));
}

#[test]
fn hooks_fire_from_the_run_loop() {
    // LD A,0x42 then JR $
    let mut machine = machine_with(&[0x3E, 0x42, 0x18, 0xFE]);
    let mut table = HookTable::new();
    table
        .register(machine.memory_mut(), HOOK_ADDR, 0x3E, record_call)
        .expect("register");

    let mut calls = Calls::default();
    let mut code = 0;
    let mut context = HookContext {
        events: &mut calls,
        secret_code_bcd: &mut code,
    };
    machine
        .emulate_cycles(1000, &mut |m: &mut Machine, address| {
            table.trigger(m, &mut context, address)
        })
        .expect("run");

    assert_eq!(calls.values.len(), 1);
    assert_eq!(machine.regs().a, 0x42);
    assert_eq!(machine.pc(), HOOK_ADDR + 2);
}
