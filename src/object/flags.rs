//! Flags de abertura de objetos.

use bitflags::bitflags;

bitflags! {
    /// Flags passadas para `open`/`duplicate`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        /// Falha se o objeto já existe.
        const CREATE_NEW    = 0x01;
        /// Falha se o objeto NÃO existe.
        const OPEN_EXISTING = 0x02;
        /// Para arquivos: sempre posiciona no fim antes de escrever.
        const APPEND        = 0x04;
        const READ          = 0x08;
        const WRITE         = 0x10;
        /// Direito de esperar no handle.
        const SYNC          = 0x20;
        /// Trunca/reseta ao abrir.
        const TRUNC         = 0x40;
        /// Handle privado do kernel, sem task dona.
        const KERNEL        = 0x8000;
    }
}

impl OpenFlags {
    /// Bits que só fazem sentido durante a abertura.
    pub const DISPOSITION: OpenFlags = OpenFlags::CREATE_NEW.union(OpenFlags::OPEN_EXISTING);

    /// Flags que ficam gravadas no hnode.
    pub fn persistent(self) -> OpenFlags {
        self.difference(Self::DISPOSITION)
    }

    /// `CREATE_NEW` e `OPEN_EXISTING` juntos nunca podem ser satisfeitos.
    pub fn is_consistent(self) -> bool {
        !self.contains(Self::DISPOSITION)
    }
}
